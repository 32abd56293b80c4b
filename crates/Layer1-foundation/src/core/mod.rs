//! Core Module - 파이프라인 데이터 모델
//!
//! 요청 하나 동안만 존재하는 값들입니다. 요청 간 공유되는 상태는 없습니다.
//!
//! ```text
//! repo_url ──► RepositoryRef ──► RepoMetadata + FileTree
//!                                      │
//!                         ImportantFile[] + DependencySet
//!                                      │
//!                          ContextDocument + Stats ──► AnalysisResult
//! ```

mod types;

pub use types::{
    AnalysisResult, ContextDocument, DependencySet, EntryKind, FileTree, ImportantFile,
    LanguageShare, RepoMetadata, RepositoryRef, Stats, TreeEntry,
};
