//! GitHub REST client

use crate::accessor::RepositoryAccessor;
use crate::api::{
    languages_from_map, RepoResponse, TreeItem, TreeResponse, ACCEPT_JSON, ACCEPT_RAW,
    API_VERSION,
};
use crate::reference;
use crate::status::{
    classify_failure, header_u64, next_page_url, Resource, HEADER_RATELIMIT_REMAINING,
};
use async_trait::async_trait;
use repolens_foundation::{
    ContextLimits, Error, FileTree, GithubSettings, LanguageShare, RepoMetadata, RepositoryRef,
    Result, TreeEntry,
};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Repository accessor backed by the GitHub REST API
pub struct GithubClient {
    client: Client,
    settings: GithubSettings,
    max_tree_entries: usize,
}

impl GithubClient {
    /// Create a client from explicit settings
    pub fn new(settings: GithubSettings, limits: &ContextLimits) -> Result<Self> {
        let mut builder = Client::builder().user_agent(settings.user_agent.clone());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        if settings.token.is_some() && settings.effective_token().is_none() {
            warn!("Ignoring placeholder GitHub token, proceeding without authentication");
        }

        Ok(Self {
            client,
            settings,
            max_tree_entries: limits.max_tree_entries,
        })
    }

    pub fn settings(&self) -> &GithubSettings {
        &self.settings
    }

    /// `{api_base_url}/repos/{owner}/{name}/{rest...}`
    fn repo_url(&self, repo: &RepositoryRef, rest: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.settings.api_base_url)
            .map_err(|e| Error::Config(format!("Invalid GitHub API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("GitHub API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["repos", repo.owner(), repo.name()])
            .extend(rest.iter().copied());
        Ok(url)
    }

    /// Send one GET; only transport failures are errors here
    async fn send(&self, url: Url, accept: &str) -> Result<Response> {
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .header("x-github-api-version", API_VERSION);
        if let Some(token) = self.settings.effective_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::HostingUnavailable(e.to_string()))?;

        if let Some(remaining) = header_u64(response.headers(), HEADER_RATELIMIT_REMAINING) {
            debug!("GitHub rate limit remaining: {}", remaining);
        }

        Ok(response)
    }

    /// Non-success statuses become typed errors
    async fn ensure_success(
        &self,
        response: Response,
        subject: &str,
        resource: Resource,
    ) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(
            status,
            &headers,
            &body,
            subject,
            resource,
            self.has_credential(),
        ))
    }

    async fn get(
        &self,
        url: Url,
        accept: &str,
        subject: &str,
        resource: Resource,
    ) -> Result<Response> {
        let response = self.send(url, accept).await?;
        self.ensure_success(response, subject, resource).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, subject: &str) -> Result<T> {
        self.get(url, ACCEPT_JSON, subject, Resource::Repository)
            .await?
            .json()
            .await
            .map_err(|e| {
                Error::HostingUnavailable(format!("Invalid response for {}: {}", subject, e))
            })
    }

    /// One tree listing, following `Link: rel="next"` pages
    ///
    /// Returns `None` for an empty repository (HTTP 409).
    async fn list_tree(
        &self,
        repo: &RepositoryRef,
        tree_ref: &str,
        recursive: bool,
    ) -> Result<Option<(Vec<TreeItem>, bool)>> {
        let mut url = self.repo_url(repo, &["git", "trees", tree_ref])?;
        if recursive {
            url.query_pairs_mut().append_pair("recursive", "1");
        }

        let subject = repo.full_name();
        let mut items = Vec::new();
        let mut truncated = false;
        let mut next = Some(url);

        while let Some(page_url) = next.take() {
            let response = self.send(page_url, ACCEPT_JSON).await?;
            if response.status() == StatusCode::CONFLICT {
                info!("{} is empty", subject);
                return Ok(None);
            }
            let response = self
                .ensure_success(response, &subject, Resource::Repository)
                .await?;

            next = next_page_url(response.headers()).and_then(|u| Url::parse(&u).ok());

            let page: TreeResponse = response.json().await.map_err(|e| {
                Error::HostingUnavailable(format!("Invalid tree for {}: {}", subject, e))
            })?;

            truncated |= page.truncated;
            items.extend(page.tree);

            if items.len() > self.max_tree_entries {
                return Err(Error::TreeTooLarge {
                    limit: self.max_tree_entries,
                });
            }
        }

        Ok(Some((items, truncated)))
    }

    /// Depth-first walk, one listing per directory
    async fn walk_tree(
        &self,
        repo: &RepositoryRef,
        root: Vec<TreeItem>,
        collector: &mut TreeCollector,
    ) -> Result<()> {
        let mut stack: Vec<std::vec::IntoIter<(String, TreeItem)>> = vec![root
            .into_iter()
            .map(|item| (item.path.clone(), item))
            .collect::<Vec<_>>()
            .into_iter()];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let Some((path, item)) = frame.next() else {
                stack.pop();
                continue;
            };

            collector.push(&path, &item)?;

            if item.is_tree() {
                let children = self
                    .list_tree(repo, &item.sha, false)
                    .await?
                    .map(|(items, _)| items)
                    .unwrap_or_default();
                stack.push(
                    children
                        .into_iter()
                        .map(|child| (format!("{}/{}", path, child.path), child))
                        .collect::<Vec<_>>()
                        .into_iter(),
                );
            }
        }

        Ok(())
    }
}

#[async_trait]
impl RepositoryAccessor for GithubClient {
    fn resolve(&self, url: &str) -> Result<RepositoryRef> {
        reference::resolve(url, &self.settings.host)
    }

    fn has_credential(&self) -> bool {
        self.settings.effective_token().is_some()
    }

    async fn fetch_metadata(&self, repo: &RepositoryRef) -> Result<RepoMetadata> {
        let url = self.repo_url(repo, &[])?;
        let response: RepoResponse = self.get_json(url, &repo.full_name()).await?;
        Ok(response.into())
    }

    async fn fetch_languages(&self, repo: &RepositoryRef) -> Result<Vec<LanguageShare>> {
        let url = self.repo_url(repo, &["languages"])?;
        let map: HashMap<String, u64> = self.get_json(url, &repo.full_name()).await?;
        Ok(languages_from_map(map))
    }

    async fn fetch_tree(&self, repo: &RepositoryRef, branch: &str) -> Result<FileTree> {
        let Some((items, truncated)) = self.list_tree(repo, branch, true).await? else {
            return Ok(FileTree::default());
        };

        let mut collector = TreeCollector::new(self.max_tree_entries);

        if truncated {
            warn!(
                "Recursive listing of {} was truncated, walking directories",
                repo
            );
            let root = self
                .list_tree(repo, branch, false)
                .await?
                .map(|(items, _)| items)
                .unwrap_or_default();
            self.walk_tree(repo, root, &mut collector).await?;
        } else {
            for item in &items {
                collector.push(&item.path, item)?;
            }
        }

        let tree = collector.finish();
        info!("Fetched tree of {}: {} entries", repo, tree.len());
        Ok(tree)
    }

    async fn fetch_file(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        path: &str,
    ) -> Result<Vec<u8>> {
        let mut url = self.repo_url(repo, &["contents"])?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("GitHub API URL cannot be a base".to_string()))?
            .extend(path.split('/'));
        url.query_pairs_mut().append_pair("ref", branch);

        let response = self.get(url, ACCEPT_RAW, path, Resource::File).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HostingUnavailable(format!("Failed to read {}: {}", path, e)))?;
        Ok(bytes.to_vec())
    }
}

/// Accumulates tree entries under the node ceiling
struct TreeCollector {
    entries: Vec<TreeEntry>,
    limit: usize,
}

impl TreeCollector {
    fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    fn push(&mut self, path: &str, item: &TreeItem) -> Result<()> {
        let entry = if item.is_blob() {
            TreeEntry::file(path, item.size.unwrap_or(0))
        } else if item.is_tree() {
            TreeEntry::dir(path)
        } else {
            debug!("Skipping {} entry {}", item.kind, path);
            return Ok(());
        };

        if self.entries.len() >= self.limit {
            return Err(Error::TreeTooLarge { limit: self.limit });
        }
        self.entries.push(entry);
        Ok(())
    }

    fn finish(self) -> FileTree {
        FileTree::new(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(path: &str, kind: &str, size: Option<u64>) -> TreeItem {
        TreeItem {
            path: path.to_string(),
            kind: kind.to_string(),
            sha: format!("sha-{}", path),
            size,
        }
    }

    fn client(base: &str) -> GithubClient {
        let settings = GithubSettings {
            api_base_url: base.to_string(),
            ..Default::default()
        };
        GithubClient::new(settings, &ContextLimits::default()).unwrap()
    }

    #[test]
    fn test_collector_skips_submodules() {
        let mut collector = TreeCollector::new(10);
        collector.push("src", &item("src", "tree", None)).unwrap();
        collector.push("src/a.rs", &item("src/a.rs", "blob", Some(5))).unwrap();
        collector.push("vendor/x", &item("vendor/x", "commit", None)).unwrap();

        let tree = collector.finish();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.entries()[1], TreeEntry::file("src/a.rs", 5));
    }

    #[test]
    fn test_collector_enforces_limit() {
        let mut collector = TreeCollector::new(2);
        collector.push("a", &item("a", "blob", Some(1))).unwrap();
        collector.push("b", &item("b", "blob", Some(1))).unwrap();
        let err = collector.push("c", &item("c", "blob", Some(1))).unwrap_err();
        assert_eq!(err, Error::TreeTooLarge { limit: 2 });
    }

    #[test]
    fn test_repo_url_building() {
        let c = client("https://api.github.com");
        let repo = RepositoryRef::new("octocat", "Hello-World");
        let url = c.repo_url(&repo, &["git", "trees", "main"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octocat/Hello-World/git/trees/main"
        );

        // enterprise-style base path is kept
        let c = client("https://ghe.example.com/api/v3/");
        let url = c.repo_url(&repo, &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/octocat/Hello-World"
        );
    }

    #[test]
    fn test_branch_with_slash_is_encoded() {
        let c = client("https://api.github.com");
        let repo = RepositoryRef::new("o", "r");
        let url = c.repo_url(&repo, &["git", "trees", "feature/x"]).unwrap();
        assert!(url.as_str().ends_with("/git/trees/feature%2Fx"));
    }

    #[test]
    fn test_placeholder_token_means_no_credential() {
        let settings = GithubSettings {
            token: Some("your_token_here".to_string()),
            ..Default::default()
        };
        let c = GithubClient::new(settings, &ContextLimits::default()).unwrap();
        assert!(!c.has_credential());
    }
}
