//! Analyzer - 파이프라인 오케스트레이션
//!
//! Accessor → Context Builder → Analysis Client를 순서대로 호출합니다.
//! 파일 하나를 못 가져오거나 매니페스트 하나를 못 읽는 것은 결과를 줄일 뿐이고,
//! 그 밖의 실패는 그대로 호출자에게 전달됩니다.

use repolens_core::{build_context, extract_dependencies, select_important_files};
use repolens_foundation::{
    AnalysisResult, AnalyzerConfig, ContextDocument, ContextLimits, Credentials, DependencySet,
    Error, RepoMetadata, RepositoryRef, Result, Stats,
};
use repolens_github::{GithubClient, RepositoryAccessor};
use repolens_provider::{AnalysisClient, TextStream};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tree reference used when the hosting service reports no default branch
const FALLBACK_BRANCH: &str = "HEAD";

/// Everything gathered before the model call
#[derive(Debug, Clone)]
pub struct PreparedAnalysis {
    pub repo_url: String,
    pub repo: RepositoryRef,
    pub prompt: String,
    pub metadata: RepoMetadata,
    pub stats: Stats,
    pub dependencies: DependencySet,
    pub context: ContextDocument,
}

impl PreparedAnalysis {
    /// Attach the model's answer
    pub fn into_result(self, summary: String) -> AnalysisResult {
        AnalysisResult {
            repo_url: self.repo_url,
            repo_name: self.repo.full_name(),
            summary,
            stats: self.stats,
            metadata: self.metadata,
            dependencies: self.dependencies,
            context_truncated: self.context.truncated,
        }
    }
}

/// Sequential analysis pipeline; keeps no state between requests
pub struct Analyzer {
    accessor: Arc<dyn RepositoryAccessor>,
    client: AnalysisClient,
    limits: ContextLimits,
}

impl Analyzer {
    pub fn new(
        accessor: Arc<dyn RepositoryAccessor>,
        client: AnalysisClient,
        limits: ContextLimits,
    ) -> Self {
        Self {
            accessor,
            client,
            limits,
        }
    }

    /// GitHub accessor + Anthropic client from explicit configuration
    ///
    /// Caller credentials override whatever the configuration carries.
    pub fn from_config(config: &AnalyzerConfig, credentials: Option<&Credentials>) -> Result<Self> {
        let config = match credentials {
            Some(credentials) => config.clone().with_credentials(credentials),
            None => config.clone(),
        };

        let accessor = GithubClient::new(config.github.clone(), &config.context)?;
        if !accessor.has_credential() {
            info!("No GitHub token; public repositories only, with lower rate limits");
        }
        let client = AnalysisClient::from_settings(&config.model)?;

        Ok(Self::new(Arc::new(accessor), client, config.context))
    }

    pub fn limits(&self) -> &ContextLimits {
        &self.limits
    }

    /// Full pipeline with a single completion request
    pub async fn run_analysis(&self, repo_url: &str, prompt: &str) -> Result<AnalysisResult> {
        let prepared = self.prepare(repo_url, prompt).await?;
        let summary = self
            .client
            .analyze(&prepared.context, &prepared.prompt)
            .await?;
        info!("Analysis of {} finished", prepared.repo);
        Ok(prepared.into_result(summary))
    }

    /// Pipeline up to (not including) the model call
    pub async fn prepare(&self, repo_url: &str, prompt: &str) -> Result<PreparedAnalysis> {
        let (repo_url, prompt) = validate_request(repo_url, prompt)?;

        let repo = self.accessor.resolve(repo_url)?;
        info!("Analyzing {}", repo);

        let mut metadata = self.accessor.fetch_metadata(&repo).await?;
        match self.accessor.fetch_languages(&repo).await {
            Ok(languages) => metadata.languages = languages,
            Err(e) => warn!("Language breakdown unavailable for {}: {}", repo, e),
        }

        let branch = if metadata.default_branch.is_empty() {
            FALLBACK_BRANCH.to_string()
        } else {
            metadata.default_branch.clone()
        };

        let tree = self.accessor.fetch_tree(&repo, &branch).await?;
        debug!("{}@{}: {} entries", repo, branch, tree.len());

        let paths = select_important_files(&tree, &self.limits);
        let files = self
            .accessor
            .fetch_important_files(&repo, &branch, &paths, self.limits.max_file_bytes)
            .await?;
        info!("Fetched {} of {} selected files", files.len(), paths.len());

        let dependencies = extract_dependencies(&files);
        let (context, stats) =
            build_context(&repo, &metadata, &tree, &files, &dependencies, &self.limits);

        if context.truncated {
            warn!(
                "Context for {} trimmed from {} to {} chars",
                repo,
                context.untruncated_chars,
                context.char_count()
            );
        }

        Ok(PreparedAnalysis {
            repo_url: repo_url.to_string(),
            repo,
            prompt: prompt.to_string(),
            metadata,
            stats,
            dependencies,
            context,
        })
    }

    /// Stream the model's answer for a prepared analysis
    pub fn stream(&self, prepared: &PreparedAnalysis) -> Result<TextStream> {
        self.client
            .analyze_streaming(&prepared.context, &prepared.prompt)
    }
}

fn validate_request<'a>(repo_url: &'a str, prompt: &'a str) -> Result<(&'a str, &'a str)> {
    let repo_url = repo_url.trim();
    if repo_url.is_empty() {
        return Err(Error::InvalidRequest("repo_url is required".to_string()));
    }
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(Error::InvalidRequest("prompt is required".to_string()));
    }
    Ok((repo_url, prompt))
}

/// Build an analyzer from `config` and run one request
pub async fn run_analysis(
    config: &AnalyzerConfig,
    repo_url: &str,
    prompt: &str,
    credentials: Option<&Credentials>,
) -> Result<AnalysisResult> {
    Analyzer::from_config(config, credentials)?
        .run_analysis(repo_url, prompt)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolens_foundation::ErrorKind;

    #[test]
    fn test_validate_request() {
        assert_eq!(
            validate_request(" https://github.com/o/r ", " hi ").unwrap(),
            ("https://github.com/o/r", "hi")
        );
        assert_eq!(
            validate_request("", "hi").unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            validate_request("https://github.com/o/r", "   ").unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
    }

    #[tokio::test]
    async fn test_run_analysis_rejects_bad_reference_before_network() {
        let config = AnalyzerConfig::default();
        let err = run_analysis(&config, "https://example.com/not-github", "Explain", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidReference);
    }
}
