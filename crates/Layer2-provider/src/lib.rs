//! # repolens-provider
//!
//! Analysis client for RepoLens.
//! Sends a bounded context document and the caller's prompt to an LLM.
//!
//! ## Features
//! - SSE streaming for real-time responses (cancel by dropping the stream)
//! - Input-size estimate before any request is sent
//! - No retries: one call, one request
//! - Anthropic Messages API provider

pub mod client;
pub mod error;
pub mod message;
pub mod providers;
pub mod r#trait;

// Core traits and types
pub use client::{AnalysisClient, TextStream, SYSTEM_PROMPT};
pub use message::{Message, MessageRole};
pub use r#trait::{
    FinishReason, ModelInfo, Provider, ProviderResponse, StreamEvent, TokenCount, TokenUsage,
    CHARS_PER_TOKEN,
};

// Error
pub use error::ProviderError;

// Provider implementations
pub use providers::anthropic::AnthropicProvider;
