//! Repository accessor trait
//!
//! The orchestrator only talks to this trait, so a pipeline run can be
//! exercised against an in-memory repository.

use async_trait::async_trait;
use repolens_foundation::{
    FileTree, ImportantFile, LanguageShare, RepoMetadata, RepositoryRef, Result,
};
use tracing::{debug, warn};

/// Read access to one hosting service
#[async_trait]
pub trait RepositoryAccessor: Send + Sync {
    /// Parse a repository URL for this host
    fn resolve(&self, url: &str) -> Result<RepositoryRef>;

    /// Whether requests carry a usable credential
    fn has_credential(&self) -> bool;

    async fn fetch_metadata(&self, repo: &RepositoryRef) -> Result<RepoMetadata>;

    /// Byte counts per language, largest first
    async fn fetch_languages(&self, repo: &RepositoryRef) -> Result<Vec<LanguageShare>>;

    /// Complete listing in depth-first order
    ///
    /// Fails with `TreeTooLarge` once the configured node ceiling is passed.
    async fn fetch_tree(&self, repo: &RepositoryRef, branch: &str) -> Result<FileTree>;

    /// Raw blob content
    ///
    /// `FileNotFound` when the path vanished after the tree was listed.
    async fn fetch_file(&self, repo: &RepositoryRef, branch: &str, path: &str)
        -> Result<Vec<u8>>;

    /// Fetch `paths` in order, skipping files that fail or are binary
    ///
    /// Content is capped to `max_bytes`. A failed file only shrinks the
    /// result; it never fails the batch.
    async fn fetch_important_files(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        paths: &[String],
        max_bytes: u64,
    ) -> Result<Vec<ImportantFile>> {
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            let bytes = match self.fetch_file(repo, branch, path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Skipping {} ({}): {}", path, e.kind(), e);
                    continue;
                }
            };

            match decode_text(bytes, max_bytes) {
                Some(content) => files.push(ImportantFile::new(path.clone(), content)),
                None => debug!("Skipping {}: not UTF-8 text", path),
            }
        }

        Ok(files)
    }
}

/// Decode fetched bytes as UTF-8 text capped at `max_bytes`
///
/// A multi-byte character split by the cap is dropped; anything else that is
/// not valid UTF-8, or contains NUL bytes, is treated as binary.
pub fn decode_text(mut bytes: Vec<u8>, max_bytes: u64) -> Option<String> {
    let cap = usize::try_from(max_bytes).unwrap_or(usize::MAX);
    if bytes.len() > cap {
        bytes.truncate(cap);
    }

    if bytes.contains(&0) {
        return None;
    }

    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(e) => {
            let utf8 = e.utf8_error();
            if utf8.error_len().is_some() {
                return None;
            }
            let valid = utf8.valid_up_to();
            let mut bytes = e.into_bytes();
            bytes.truncate(valid);
            String::from_utf8(bytes).ok()
        }
    }
}
