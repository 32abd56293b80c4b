//! # repolens-analyzer
//!
//! 저장소 분석 파이프라인의 오케스트레이터입니다.
//!
//! ## 흐름
//!
//! 1. 요청 검증 (URL, 프롬프트가 비어 있지 않은지)
//! 2. Repository Accessor: URL 해석 → 메타데이터 → 언어 비율 → 파일 트리
//! 3. Context Builder: 중요 파일 선택 → 내용 가져오기 → 의존성 추출 → 문서 조립
//! 4. Analysis Client: 모델 호출 (단일 응답 또는 스트림)
//!
//! 요청 하나가 하나의 순차 파이프라인이며, 요청 간 공유 상태나 캐시는 없습니다.
//!
//! ## 사용 예
//!
//! ```ignore
//! use repolens_analyzer::Analyzer;
//! use repolens_foundation::AnalyzerConfig;
//!
//! let config = AnalyzerConfig::load()?;
//! let analyzer = Analyzer::from_config(&config, None)?;
//! let result = analyzer
//!     .run_analysis("https://github.com/octocat/Hello-World", "Explain the architecture")
//!     .await?;
//! println!("{}", result.summary);
//! ```

pub mod analyzer;

pub use analyzer::{run_analysis, Analyzer, PreparedAnalysis};
