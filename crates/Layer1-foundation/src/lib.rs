//! # repolens-foundation
//!
//! Foundation layer for RepoLens:
//! - Core: 파이프라인 전체가 공유하는 데이터 모델 (RepositoryRef, FileTree, Stats...)
//! - Error: 에러 분류 체계 (kind + bucket)
//! - Config: 명시적 설정 값 (GitHub, Context 한도, Model)
//! - Storage: JSON 설정 파일 로드 (읽기 전용)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  repolens-cli (Layer4)                                   │
//! │          │                                               │
//! │          ▼                                               │
//! │  repolens-analyzer (Layer3) ── run_analysis()            │
//! │     │              │                   │                 │
//! │     ▼              ▼                   ▼                 │
//! │  github        core (context)      provider (model)      │
//! │  (Layer2)      (Layer2)            (Layer2)              │
//! │     └──────────────┴───────────────────┘                 │
//! │                    ▼                                     │
//! │          repolens-foundation (Layer1)                    │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, ErrorBucket, ErrorKind, Result};

// ============================================================================
// Core (데이터 모델)
// ============================================================================
pub use core::{
    AnalysisResult, ContextDocument, DependencySet, EntryKind, FileTree, ImportantFile,
    LanguageShare, RepoMetadata, RepositoryRef, Stats, TreeEntry,
};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    AnalyzerConfig, ContextLimits, Credentials, GithubSettings, ModelSettings, CONFIG_FILE,
};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;
