//! # repolens-github
//!
//! Repository accessor for RepoLens.
//! Resolves repository URLs and reads metadata, the full file tree and raw
//! blobs from the GitHub REST API.
//!
//! ## Features
//! - Transparent pagination (`Link: rel="next"`) and truncated-tree fallback
//! - Node-count ceiling enforced while the tree is collected
//! - Rate-limit headers inspected to separate `RateLimited` from `AccessDenied`
//! - No retries: every failure surfaces immediately

pub mod accessor;
pub mod api;
pub mod client;
pub mod reference;
pub mod status;

pub use accessor::RepositoryAccessor;
pub use client::GithubClient;
pub use reference::resolve;
