//! HTTP failure classification for the hosting API
//!
//! GitHub answers both quota exhaustion and missing permissions with 403, so
//! the rate-limit headers decide which of the two a response means.

use reqwest::header::HeaderMap;
use repolens_foundation::Error;

pub const HEADER_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RATELIMIT_RESET: &str = "x-ratelimit-reset";
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// What a 404 refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Repository,
    File,
}

/// Map a non-success response to the error taxonomy
pub fn classify_failure(
    status: u16,
    headers: &HeaderMap,
    body: &str,
    subject: &str,
    resource: Resource,
    authenticated: bool,
) -> Error {
    match status {
        404 => match resource {
            Resource::Repository if authenticated => Error::RepositoryNotFound(subject.to_string()),
            Resource::Repository => Error::RepositoryNotFound(format!(
                "{} (missing, or private and no credential was supplied)",
                subject
            )),
            Resource::File => Error::FileNotFound(subject.to_string()),
        },
        429 => rate_limited(headers, body),
        403 if is_rate_limited(headers, body) => rate_limited(headers, body),
        401 | 403 => {
            if authenticated {
                Error::AccessDenied(format!("{}: credential lacks access ({})", subject, status))
            } else {
                Error::AccessDenied(format!("{}: authentication required ({})", subject, status))
            }
        }
        500..=599 => Error::HostingUnavailable(format!("HTTP {}: {}", status, summarize(body))),
        _ => Error::HostingUnavailable(format!(
            "unexpected HTTP {} for {}: {}",
            status,
            subject,
            summarize(body)
        )),
    }
}

/// Whether a 403 is GitHub throttling rather than a permission failure
///
/// Primary limit: `x-ratelimit-remaining: 0`. Secondary (abuse) limit:
/// a `retry-after` header, or an error message naming the secondary limit.
pub fn is_rate_limited(headers: &HeaderMap, body: &str) -> bool {
    let exhausted = header_u64(headers, HEADER_RATELIMIT_REMAINING) == Some(0);
    let retry_after = headers.contains_key(HEADER_RETRY_AFTER);
    let secondary = extract_message(body)
        .is_some_and(|m| m.to_lowercase().contains("secondary rate limit"));
    exhausted || retry_after || secondary
}

fn rate_limited(headers: &HeaderMap, body: &str) -> Error {
    let reset_at = header_u64(headers, HEADER_RATELIMIT_RESET);
    let message = extract_message(body).unwrap_or_else(|| "hosting API quota exhausted".to_string());
    Error::rate_limited(message, reset_at)
}

pub fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// GitHub error bodies look like `{"message": "...", "documentation_url": "..."}`
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn summarize(body: &str) -> String {
    extract_message(body).unwrap_or_else(|| body.chars().take(200).collect())
}

/// Next page URL from an RFC 8288 `Link` header
pub fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(reqwest::header::LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| {
            let p = p.trim();
            p == "rel=\"next\"" || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
