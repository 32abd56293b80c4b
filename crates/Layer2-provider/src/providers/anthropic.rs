//! Anthropic (Claude) provider implementation with SSE streaming

use crate::{
    error::ProviderError,
    r#trait::{FinishReason, ModelInfo, Provider, ProviderResponse, StreamEvent, TokenUsage},
    Message, MessageRole,
};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use repolens_foundation::ModelSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MESSAGES_PATH: &str = "/v1/messages";

/// Anthropic Claude provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    current_model: ModelInfo,
    temperature: f32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider against the public API
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, max_tokens: u32) -> Self {
        let settings = ModelSettings {
            model: model.into(),
            max_tokens,
            ..Default::default()
        };
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: messages_endpoint(&settings.api_base_url),
            current_model: model_info(&settings),
            temperature: settings.temperature,
        }
    }

    /// Create from explicit settings; a missing key leaves the provider unavailable
    pub fn from_settings(settings: &ModelSettings) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone().unwrap_or_default(),
            endpoint: messages_endpoint(&settings.api_base_url),
            current_model: model_info(settings),
            temperature: settings.temperature,
        })
    }

    /// Build request for Anthropic API
    fn build_request(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
        stream: bool,
    ) -> AnthropicRequest {
        AnthropicRequest {
            model: self.current_model.id.clone(),
            max_tokens: self.current_model.max_output_tokens,
            temperature: self.temperature,
            system: system_prompt.map(|s| s.to_string()),
            messages: messages.iter().map(AnthropicMessage::from).collect(),
            stream,
        }
    }

    /// Make HTTP request to Anthropic API
    async fn make_request(
        &self,
        request: &AnthropicRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        if !self.is_available() {
            return Err(ProviderError::NotConfigured(
                "Anthropic API key is not set".to_string(),
            ));
        }

        debug!(
            "POST {} (model {}, stream {})",
            self.endpoint, request.model, request.stream
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();

        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http_status(status, &body));
        }

        Ok(response)
    }

    /// Parse SSE event line
    fn parse_sse_line(line: &str) -> Option<AnthropicStreamEvent> {
        let data = line.strip_prefix("data:")?.trim_start();
        if data == "[DONE]" {
            return None;
        }

        match serde_json::from_str(data) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!("Ignoring unparseable SSE data: {}", e);
                None
            }
        }
    }
}

fn messages_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), MESSAGES_PATH)
}

fn model_info(settings: &ModelSettings) -> ModelInfo {
    ModelInfo {
        id: settings.model.clone(),
        provider: "anthropic".to_string(),
        context_window: settings.context_window,
        max_output_tokens: settings.max_tokens,
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn model(&self) -> &ModelInfo {
        &self.current_model
    }

    fn stream(
        &self,
        messages: Vec<Message>,
        system_prompt: Option<String>,
    ) -> Pin<Box<dyn Stream<Item = StreamEvent> + Send + '_>> {
        let request = self.build_request(&messages, system_prompt.as_deref(), true);

        Box::pin(async_stream::stream! {
            // Make request
            let response = match self.make_request(&request).await {
                Ok(r) => r,
                Err(e) => {
                    yield StreamEvent::Error(e);
                    return;
                }
            };

            // Process SSE stream; lines are split on raw bytes so multi-byte
            // characters spanning chunks stay intact
            let mut byte_stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();
            let mut usage = TokenUsage::default();

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield StreamEvent::Error(ProviderError::StreamError(e.to_string()));
                        return;
                    }
                };

                buffer.extend_from_slice(&chunk);

                // Process complete lines
                while let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
                    let raw: Vec<u8> = buffer.drain(..=newline_pos).collect();
                    let line = String::from_utf8_lossy(&raw);
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let Some(event) = Self::parse_sse_line(line) else {
                        continue;
                    };

                    match event {
                        AnthropicStreamEvent::ContentBlockDelta { delta } => {
                            if let ContentDelta::TextDelta { text } = delta {
                                yield StreamEvent::Text(text);
                            }
                        }
                        AnthropicStreamEvent::MessageStart { message } => {
                            if let Some(u) = message.usage {
                                usage.input_tokens = u.input_tokens;
                            }
                        }
                        AnthropicStreamEvent::MessageDelta { delta, usage: msg_usage } => {
                            if let Some(u) = msg_usage {
                                usage.output_tokens = u.output_tokens;
                            }
                            let reason = delta.and_then(|d| d.stop_reason);
                            if FinishReason::from_stop_reason(reason.as_deref()) == FinishReason::MaxTokens {
                                warn!("Response stopped at the max_tokens limit");
                            }
                        }
                        AnthropicStreamEvent::MessageStop => {
                            yield StreamEvent::Usage(usage);
                            yield StreamEvent::Done;
                            return;
                        }
                        AnthropicStreamEvent::Error { error } => {
                            yield StreamEvent::Error(ProviderError::from_stream_error(
                                &error.kind,
                                &error.message,
                            ));
                            return;
                        }
                        AnthropicStreamEvent::Other => {}
                    }
                }
            }

            // Stream ended without MessageStop
            yield StreamEvent::Error(ProviderError::StreamError(
                "stream ended before message_stop".to_string(),
            ));
        })
    }

    async fn complete(
        &self,
        messages: Vec<Message>,
        system_prompt: Option<String>,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = self.build_request(&messages, system_prompt.as_deref(), false);

        let response = self.make_request(&request).await?;

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content: String = api_response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();

        Ok(ProviderResponse {
            content,
            usage: TokenUsage {
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
            },
            finish_reason: FinishReason::from_stop_reason(api_response.stop_reason.as_deref()),
            model: api_response.model,
        })
    }

    fn is_available(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// ============================================================================
// Anthropic API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

impl From<&Message> for AnthropicMessage {
    fn from(msg: &Message) -> Self {
        let role = match msg.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };
        AnthropicMessage {
            role,
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentDelta {
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

// SSE Event types
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicStreamEvent {
    #[serde(rename = "message_start")]
    MessageStart { message: MessageStartData },
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { delta: ContentDelta },
    #[serde(rename = "message_delta")]
    MessageDelta {
        delta: Option<MessageDeltaData>,
        usage: Option<MessageDeltaUsage>,
    },
    #[serde(rename = "message_stop")]
    MessageStop,
    #[serde(rename = "error")]
    Error { error: ErrorData },
    /// ping, content_block_start, content_block_stop
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessageStartData {
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct MessageDeltaData {
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageDeltaUsage {
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorData {
    #[serde(rename = "type", default)]
    kind: String,
    message: String,
}
