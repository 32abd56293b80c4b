//! Non-interactive runs and result reporting

use futures::StreamExt;
use repolens_analyzer::Analyzer;
use repolens_foundation::{AnalysisResult, AnalyzerConfig, Credentials, Error, ErrorBucket, Result};
use serde_json::{json, Value};
use std::io::Write;
use std::process::ExitCode;

/// Run the whole pipeline and print the result as JSON
pub async fn run_once(
    config: &AnalyzerConfig,
    credentials: &Credentials,
    repo_url: &str,
    prompt: &str,
) -> Result<()> {
    let analyzer = Analyzer::from_config(config, Some(credentials))?;
    let result = analyzer.run_analysis(repo_url, prompt).await?;
    println!("{}", pretty(&success_report(&result)));
    Ok(())
}

/// Print the answer chunk by chunk; Ctrl-C drops the stream
pub async fn run_streaming(
    config: &AnalyzerConfig,
    credentials: &Credentials,
    repo_url: &str,
    prompt: &str,
) -> Result<()> {
    let analyzer = Analyzer::from_config(config, Some(credentials))?;
    let prepared = analyzer.prepare(repo_url, prompt).await?;

    println!(
        "# {} ({} files, {} dirs, {:.1} KB)\n",
        prepared.repo,
        prepared.stats.total_files,
        prepared.stats.total_dirs,
        prepared.stats.total_size_kb
    );

    let mut stream = analyzer.stream(&prepared)?;
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            chunk = stream.next() => match chunk {
                Some(Ok(text)) => {
                    print!("{}", text);
                    let _ = stdout.flush();
                }
                Some(Err(e)) => {
                    println!();
                    return Err(e);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted; cancelling the model request");
                break;
            }
        }
    }

    println!();
    Ok(())
}

/// Print the failure report and pick the exit code
///
/// In streaming mode stdout already carries partial text, so the report goes
/// to stderr.
pub fn report_failure(error: &Error, streaming: bool) -> ExitCode {
    let report = pretty(&failure_report(error));
    if streaming {
        eprintln!("{}", report);
    } else {
        println!("{}", report);
    }
    ExitCode::from(exit_code(error.bucket()))
}

fn success_report(result: &AnalysisResult) -> Value {
    let metadata = &result.metadata;
    json!({
        "success": true,
        "repo_url": result.repo_url,
        "repo_name": result.repo_name,
        "summary": result.summary,
        "stats": result.stats,
        "metadata": {
            "language": metadata.language,
            "stars": metadata.stars,
            "description": metadata.description,
            "default_branch": metadata.default_branch,
            "license": metadata.license,
            "topics": metadata.topics,
            "languages": metadata.languages,
        },
        "dependencies": result.dependencies,
        "context_truncated": result.context_truncated,
    })
}

fn failure_report(error: &Error) -> Value {
    json!({
        "success": false,
        "error": error.to_string(),
        "kind": error.kind(),
        "bucket": error.bucket(),
    })
}

fn exit_code(bucket: ErrorBucket) -> u8 {
    match bucket {
        ErrorBucket::CallerCorrectable => 2,
        ErrorBucket::NotFoundOrDenied => 3,
        ErrorBucket::ExternalService => 4,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolens_foundation::{RepoMetadata, Stats};

    #[test]
    fn test_success_report_shape() {
        let mut dependencies = repolens_foundation::DependencySet::new();
        dependencies.insert("npm".to_string(), vec!["react".to_string()]);

        let result = AnalysisResult {
            repo_url: "https://github.com/octocat/Hello-World".to_string(),
            repo_name: "octocat/Hello-World".to_string(),
            summary: "A demo".to_string(),
            stats: Stats {
                total_files: 3,
                total_dirs: 1,
                total_size_kb: 1.5,
            },
            metadata: RepoMetadata {
                language: Some("JavaScript".to_string()),
                stars: 80,
                ..Default::default()
            },
            dependencies,
            context_truncated: false,
        };

        let report = success_report(&result);
        assert_eq!(report["success"], true);
        assert_eq!(report["repo_name"], "octocat/Hello-World");
        assert_eq!(report["stats"]["total_files"], 3);
        assert_eq!(report["metadata"]["language"], "JavaScript");
        assert_eq!(report["metadata"]["stars"], 80);
        assert!(report["metadata"]["description"].is_null());
        assert_eq!(report["dependencies"]["npm"][0], "react");
    }

    #[test]
    fn test_failure_report_carries_kind_and_bucket() {
        let report = failure_report(&Error::ContextTooLarge("prompt too long".to_string()));
        assert_eq!(report["success"], false);
        assert_eq!(report["kind"], "context_too_large");
        assert_eq!(report["bucket"], "caller_correctable");
        assert_eq!(report["error"], "Context too large: prompt too long");
    }

    #[test]
    fn test_exit_codes_by_bucket() {
        assert_eq!(exit_code(Error::InvalidReference("x".into()).bucket()), 2);
        assert_eq!(exit_code(Error::RepositoryNotFound("o/r".into()).bucket()), 3);
        assert_eq!(exit_code(Error::rate_limited("slow down", None).bucket()), 4);
        assert_eq!(exit_code(Error::ModelUnavailable("down".into()).bucket()), 4);
    }
}
