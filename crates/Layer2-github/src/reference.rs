//! Repository URL parsing

use repolens_foundation::{Error, RepositoryRef, Result};
use url::Url;

/// Parse `https://<host>/owner/name[/...]` into a [`RepositoryRef`]
///
/// A missing scheme is read as `https`, `www.` in front of the host is
/// accepted, and a `.git` suffix on the name is dropped.
pub fn resolve(input: &str, host: &str) -> Result<RepositoryRef> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidReference("empty repository URL".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| Error::InvalidReference(format!("{}: {}", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidReference(format!(
            "{}: only http/https URLs are supported",
            trimmed
        )));
    }

    let url_host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let expected = host.to_ascii_lowercase();
    if url_host != expected && url_host != format!("www.{}", expected) {
        return Err(Error::InvalidReference(format!(
            "{}: not a {} repository URL",
            trimmed, host
        )));
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 {
        return Err(Error::InvalidReference(format!(
            "{}: expected /owner/name in the path",
            trimmed
        )));
    }

    let owner = segments[0];
    let name = segments[1].strip_suffix(".git").unwrap_or(segments[1]);

    if !is_valid_segment(owner) || !is_valid_segment(name) {
        return Err(Error::InvalidReference(format!(
            "{}: invalid owner or repository name",
            trimmed
        )));
    }

    Ok(RepositoryRef::new(owner, name))
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
