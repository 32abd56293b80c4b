//! Storage module for RepoLens
//!
//! - `json`: JSON - 설정 파일 로드 (읽기 전용)

mod json;

pub use json::JsonStore;
