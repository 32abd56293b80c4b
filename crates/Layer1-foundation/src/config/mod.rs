//! Config - 통합 설정 관리
//!
//! - `limits.rs` - 컨텍스트 크기 한도
//! - `analyzer.rs` - AnalyzerConfig 통합 설정 (GitHub, Model, Credentials)
//!
//! 설정은 전역 상태가 아니라 각 컴포넌트 생성자에 전달되는 값입니다.

mod analyzer;
mod limits;

pub use analyzer::{
    is_usable_token, AnalyzerConfig, Credentials, GithubSettings, ModelSettings, CONFIG_FILE,
    ENV_ANTHROPIC_API_KEY, ENV_GITHUB_TOKEN, ENV_MODEL,
};
pub use limits::ContextLimits;
