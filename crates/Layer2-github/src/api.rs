//! GitHub REST API payloads

use repolens_foundation::{LanguageShare, RepoMetadata};
use serde::Deserialize;
use std::collections::HashMap;

pub const ACCEPT_JSON: &str = "application/vnd.github+json";
pub const ACCEPT_RAW: &str = "application/vnd.github.raw";
pub const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
pub struct RepoResponse {
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    pub default_branch: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub license: Option<LicenseInfo>,
}

#[derive(Debug, Deserialize)]
pub struct LicenseInfo {
    pub name: Option<String>,
    pub spdx_id: Option<String>,
}

impl From<RepoResponse> for RepoMetadata {
    fn from(repo: RepoResponse) -> Self {
        let license = repo
            .license
            .and_then(|l| l.name.or(l.spdx_id))
            .filter(|name| !name.is_empty());

        RepoMetadata {
            full_name: repo.full_name,
            description: repo.description.filter(|d| !d.trim().is_empty()),
            language: repo.language,
            stars: repo.stargazers_count,
            default_branch: repo.default_branch,
            topics: repo.topics,
            license,
            languages: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TreeResponse {
    #[serde(default)]
    pub tree: Vec<TreeItem>,
    /// Set when a recursive listing exceeded the API's own size limit
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeItem {
    pub path: String,
    /// `blob`, `tree` or `commit` (submodule)
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
    pub size: Option<u64>,
}

impl TreeItem {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }

    pub fn is_tree(&self) -> bool {
        self.kind == "tree"
    }
}

/// `/languages` returns `{"Rust": 12345, "Shell": 678}`
pub fn languages_from_map(map: HashMap<String, u64>) -> Vec<LanguageShare> {
    let mut languages: Vec<LanguageShare> = map
        .into_iter()
        .map(|(name, bytes)| LanguageShare { name, bytes })
        .collect();
    languages.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.name.cmp(&b.name)));
    languages
}
