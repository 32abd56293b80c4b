//! Provider trait and common types

use crate::error::ProviderError;
use crate::Message;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Rough approximation for English text and code
pub const CHARS_PER_TOKEN: usize = 4;

/// Events emitted during streaming
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Text content delta
    Text(String),

    /// Token usage update
    Usage(TokenUsage),

    /// Stream completed
    Done,

    /// Error occurred
    Error(ProviderError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Model information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model ID (e.g., "claude-sonnet-4-20250514")
    pub id: String,

    /// Provider name (e.g., "anthropic")
    pub provider: String,

    /// Context window size (tokens)
    pub context_window: u32,

    /// Max output tokens requested per call
    pub max_output_tokens: u32,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            context_window: 200_000,
            max_output_tokens: 4096,
        }
    }
}

/// Token counting result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCount {
    /// Total token count
    pub total: u32,

    /// Tokens from messages
    pub messages: u32,

    /// Tokens from system prompt
    pub system: u32,

    /// Whether this is an estimate (not exact count)
    pub is_estimate: bool,
}

impl TokenCount {
    /// Check if request fits within context window
    pub fn fits_context(&self, context_window: u32, reserve_output: u32) -> bool {
        u64::from(self.total) + u64::from(reserve_output) <= u64::from(context_window)
    }
}

fn estimate_tokens(chars: usize) -> u32 {
    u32::try_from(chars.div_ceil(CHARS_PER_TOKEN)).unwrap_or(u32::MAX)
}

/// LLM Provider trait
///
/// Implement this trait to add support for a new LLM provider.
/// Implementations must not retry: every call is exactly one request.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get current model information
    fn model(&self) -> &ModelInfo;

    /// Send messages and get a streaming response
    ///
    /// Dropping the returned stream aborts the underlying request.
    fn stream(
        &self,
        messages: Vec<Message>,
        system_prompt: Option<String>,
    ) -> Pin<Box<dyn Stream<Item = StreamEvent> + Send + '_>>;

    /// Send messages and get a complete response (non-streaming)
    async fn complete(
        &self,
        messages: Vec<Message>,
        system_prompt: Option<String>,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Check if the provider is available (e.g., API key is set)
    fn is_available(&self) -> bool;

    /// Count tokens for the given input
    ///
    /// The default implementation is a character-based estimate
    /// (`CHARS_PER_TOKEN` characters per token, rounded up).
    fn count_tokens(&self, messages: &[Message], system_prompt: Option<&str>) -> TokenCount {
        let message_chars: usize = messages.iter().map(|m| m.content.chars().count()).sum();
        let system_chars = system_prompt.map_or(0, |s| s.chars().count());

        TokenCount {
            total: estimate_tokens(message_chars + system_chars),
            messages: estimate_tokens(message_chars),
            system: estimate_tokens(system_chars),
            is_estimate: true,
        }
    }

    /// Check if the input fits within the model's context window
    ///
    /// Returns the token count and whether it fits, reserving space for output.
    fn check_context_fit(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> (TokenCount, bool) {
        let count = self.count_tokens(messages, system_prompt);
        let model = self.model();
        let fits = count.fits_context(model.context_window, model.max_output_tokens);
        (count, fits)
    }
}

/// Complete response from provider (for non-streaming)
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Text content
    pub content: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Finish reason
    pub finish_reason: FinishReason,

    /// Model that served the request
    pub model: String,
}

/// Reason for completion finishing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// Completed naturally
    Stop,

    /// Hit max tokens limit
    MaxTokens,

    /// Unknown/other
    #[default]
    Other,
}

impl FinishReason {
    pub fn from_stop_reason(reason: Option<&str>) -> Self {
        match reason {
            Some("end_turn") | Some("stop_sequence") => FinishReason::Stop,
            Some("max_tokens") => FinishReason::MaxTokens,
            _ => FinishReason::Other,
        }
    }
}
