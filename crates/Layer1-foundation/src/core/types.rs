//! Core Types - 공용 타입 정의
//!
//! 모든 레이어에서 공통으로 사용하는 타입들

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Repository Reference
// ============================================================================

/// `owner/name` pair derived once from the input URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ============================================================================
// File Tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One node of the repository listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Slash-separated path relative to the repository root
    pub path: String,
    pub kind: EntryKind,
    /// Zero for directories
    pub size_bytes: u64,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size_bytes,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Dir,
            size_bytes: 0,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Last path component
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Number of ancestors (0 for root-level entries)
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }

    /// Parent directory path, `None` at the root
    pub fn parent(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(parent, _)| parent)
    }

    pub fn is_root_level(&self) -> bool {
        !self.path.contains('/')
    }
}

/// Ordered listing of a repository in traversal (depth-first) order
///
/// Paths are unique; construction keeps the first occurrence of a path and
/// never re-sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTree {
    entries: Vec<TreeEntry>,
}

impl FileTree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.path.clone()))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn files(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter().filter(|e| e.is_file())
    }

    pub fn get(&self, path: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TreeEntry> for FileTree {
    fn from_iter<I: IntoIterator<Item = TreeEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Repository statistics, always computed from the complete tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_files: usize,
    pub total_dirs: usize,
    /// Sum of file sizes in KiB, rounded to two decimals
    pub total_size_kb: f64,
}

impl Stats {
    pub fn from_tree(tree: &FileTree) -> Self {
        let mut total_files = 0;
        let mut total_dirs = 0;
        let mut total_bytes: u64 = 0;

        for entry in tree.iter() {
            match entry.kind {
                EntryKind::File => {
                    total_files += 1;
                    total_bytes += entry.size_bytes;
                }
                EntryKind::Dir => total_dirs += 1,
            }
        }

        Self {
            total_files,
            total_dirs,
            total_size_kb: (total_bytes as f64 / 1024.0 * 100.0).round() / 100.0,
        }
    }

    pub fn total_entries(&self) -> usize {
        self.total_files + self.total_dirs
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Bytes of source attributed to one language by the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoMetadata {
    /// `owner/name` as reported by the hosting service
    pub full_name: String,
    pub description: Option<String>,
    /// Primary language
    pub language: Option<String>,
    pub stars: u64,
    pub default_branch: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub license: Option<String>,
    /// Largest first; empty when unknown
    #[serde(default)]
    pub languages: Vec<LanguageShare>,
}

// ============================================================================
// Context inputs / outputs
// ============================================================================

/// Fetched content of one selected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantFile {
    pub path: String,
    pub content: String,
}

impl ImportantFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Ecosystem name → declared package identifiers
pub type DependencySet = BTreeMap<String, Vec<String>>;

/// Bounded text handed to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub text: String,
    /// Whether any section was trimmed to fit the ceiling
    pub truncated: bool,
    /// Character count of the document before trimming
    pub untruncated_chars: usize,
}

impl ContextDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

// ============================================================================
// Analysis Result
// ============================================================================

/// Terminal artifact of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub repo_url: String,
    pub repo_name: String,
    pub summary: String,
    pub stats: Stats,
    pub metadata: RepoMetadata,
    pub dependencies: DependencySet,
    pub context_truncated: bool,
}
