//! repolens-core: Context Builder for RepoLens
//!
//! Layer2 - 저장소 트리와 파일 내용을 모델에 보낼 하나의 문서로 만드는 레이어
//!
//! # 주요 모듈
//!
//! - `context`: 트리 렌더링, 중요 파일 선택, 크기 제한 문서 조립
//! - `manifest`: 생태계 레지스트리 기반 의존성 추출
//!
//! # 사용 예시
//!
//! ```ignore
//! use repolens_core::{build_context, extract_dependencies, select_important_files};
//!
//! let paths = select_important_files(&tree, &limits);
//! let files = accessor.fetch_important_files(&repo, &branch, &paths, limits.max_file_bytes).await?;
//! let deps = extract_dependencies(&files);
//! let (document, stats) = build_context(&repo, &metadata, &tree, &files, &deps, &limits);
//! ```

pub mod context;
pub mod manifest;

// Re-exports: Context
pub use context::{
    build_context, is_binary_path, render_tree, select_important_files, TRUNCATION_MARKER,
};

// Re-exports: Manifest
pub use manifest::{
    extract_dependencies, find_manifest, is_manifest, Ecosystem, Manifest, ManifestError,
    DEV_SUFFIX, REGISTRY,
};
