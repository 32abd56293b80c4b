//! Analysis Client - 컨텍스트 문서 + 사용자 요청 → 모델 응답
//!
//! 재시도하지 않습니다. 호출 하나가 정확히 하나의 API 요청입니다.
//! 입력이 모델 한도를 넘는지는 요청 전에 추정하고, API가 길이 초과로 거절한 경우와
//! 마찬가지로 `ContextTooLarge`로 보고합니다.

use crate::providers::anthropic::AnthropicProvider;
use crate::r#trait::{FinishReason, Provider, StreamEvent};
use crate::Message;
use futures::{Stream, StreamExt};
use repolens_foundation::{ContextDocument, Error, ModelSettings, Result};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed framing sent as the system prompt of every analysis
pub const SYSTEM_PROMPT: &str = "You are an expert software engineer and code analyst.
You will be provided with information about a GitHub repository including its structure,
dependencies, key files, and metadata. Your task is to analyze this codebase and provide
insightful, accurate, and comprehensive responses to the user's questions or requests.

Focus on:
- Understanding the overall architecture and design patterns
- Identifying key technologies and frameworks used
- Explaining how different components interact
- Highlighting notable features or implementation details
- Providing practical insights for developers working with this code

Be thorough but concise. Use your expertise to provide value beyond what's immediately
obvious from the file structure.";

/// Lazy stream of response text chunks
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Sends one context document plus a prompt to the model
#[derive(Clone)]
pub struct AnalysisClient {
    provider: Arc<dyn Provider>,
}

impl AnalysisClient {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Anthropic client from explicit settings
    pub fn from_settings(settings: &ModelSettings) -> Result<Self> {
        let provider = AnthropicProvider::from_settings(settings)?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// `Message` list for one analysis
    pub fn build_messages(context: &ContextDocument, prompt: &str) -> Vec<Message> {
        vec![Message::analysis_request(context, prompt)]
    }

    /// Credential and input-size checks done before any request is sent
    fn preflight(&self, messages: &[Message]) -> Result<()> {
        if !self.provider.is_available() {
            return Err(Error::ModelUnavailable(format!(
                "no API key configured for {}",
                self.provider.model().provider
            )));
        }

        let (count, fits) = self.provider.check_context_fit(messages, Some(SYSTEM_PROMPT));
        let model = self.provider.model();
        if !fits {
            return Err(Error::ContextTooLarge(format!(
                "estimated {} input tokens plus {} output tokens exceeds the {}-token window of {}",
                count.total, model.max_output_tokens, model.context_window, model.id
            )));
        }

        debug!("Estimated input: {} tokens ({})", count.total, model.id);
        Ok(())
    }

    /// One completion request; returns the full response text
    pub async fn analyze(&self, context: &ContextDocument, prompt: &str) -> Result<String> {
        let messages = Self::build_messages(context, prompt);
        self.preflight(&messages)?;

        let response = self
            .provider
            .complete(messages, Some(SYSTEM_PROMPT.to_string()))
            .await?;

        if response.finish_reason == FinishReason::MaxTokens {
            warn!("Analysis stopped at the max_tokens limit");
        }
        info!(
            "Analysis complete: {} input / {} output tokens",
            response.usage.input_tokens, response.usage.output_tokens
        );

        Ok(response.content)
    }

    /// Streamed completion
    ///
    /// Nothing is sent until the stream is first polled. The stream ends after
    /// the last chunk or after the first error; dropping it cancels the
    /// request. It cannot be restarted.
    pub fn analyze_streaming(&self, context: &ContextDocument, prompt: &str) -> Result<TextStream> {
        let messages = Self::build_messages(context, prompt);
        self.preflight(&messages)?;

        let provider = Arc::clone(&self.provider);
        Ok(Box::pin(async_stream::stream! {
            let mut events = provider.stream(messages, Some(SYSTEM_PROMPT.to_string()));

            while let Some(event) = events.next().await {
                match event {
                    StreamEvent::Text(text) => yield Ok(text),
                    StreamEvent::Usage(usage) => {
                        info!(
                            "Analysis stream complete: {} input / {} output tokens",
                            usage.input_tokens, usage.output_tokens
                        );
                    }
                    StreamEvent::Done => break,
                    StreamEvent::Error(e) => {
                        yield Err(Error::from(e));
                        break;
                    }
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::r#trait::{ModelInfo, ProviderResponse, TokenUsage};
    use async_trait::async_trait;
    use repolens_foundation::ErrorKind;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Sets its flag when dropped
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    struct FakeProvider {
        model: ModelInfo,
        available: bool,
        reply: std::result::Result<String, ProviderError>,
        events: Vec<StreamEvent>,
        calls: AtomicUsize,
        last_messages: Mutex<Vec<Message>>,
        dropped: Arc<AtomicBool>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                model: ModelInfo::new("fake-model", "fake"),
                available: true,
                reply: Ok("analysis".to_string()),
                events: vec![
                    StreamEvent::Text("Hello".to_string()),
                    StreamEvent::Text(", world".to_string()),
                    StreamEvent::Usage(TokenUsage::default()),
                    StreamEvent::Done,
                ],
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
                dropped: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl Provider for FakeProvider {
        fn model(&self) -> &ModelInfo {
            &self.model
        }

        fn stream(
            &self,
            messages: Vec<Message>,
            _system_prompt: Option<String>,
        ) -> Pin<Box<dyn Stream<Item = StreamEvent> + Send + '_>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages;
            let events = self.events.clone();
            let guard = DropFlag(self.dropped.clone());
            Box::pin(async_stream::stream! {
                let _guard = guard;
                for event in events {
                    yield event;
                }
                // never finishes on its own unless Done was sent
                futures::future::pending::<()>().await;
            })
        }

        async fn complete(
            &self,
            messages: Vec<Message>,
            system_prompt: Option<String>,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(system_prompt.as_deref(), Some(SYSTEM_PROMPT));
            *self.last_messages.lock().unwrap() = messages;
            self.reply.clone().map(|content| ProviderResponse {
                content,
                usage: TokenUsage::default(),
                finish_reason: FinishReason::Stop,
                model: self.model.id.clone(),
            })
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    fn document(text: &str) -> ContextDocument {
        ContextDocument {
            text: text.to_string(),
            truncated: false,
            untruncated_chars: text.chars().count(),
        }
    }

    #[tokio::test]
    async fn test_analyze_returns_text() {
        let fake = Arc::new(FakeProvider::new());
        let client = AnalysisClient::new(fake.clone());

        let summary = client.analyze(&document("# Repo"), "Explain it").await.unwrap();
        assert_eq!(summary, "analysis");

        let messages = fake.last_messages.lock().unwrap().clone();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("# Repo"));
        assert!(messages[0].content.contains("User's Request:\nExplain it"));
    }

    #[tokio::test]
    async fn test_long_prompt_is_context_too_large() {
        let mut fake = FakeProvider::new();
        fake.model.context_window = 10_000;
        fake.model.max_output_tokens = 1_000;
        let fake = Arc::new(fake);
        let client = AnalysisClient::new(fake.clone());

        let prompt = "x".repeat(50_000);
        let err = client.analyze(&document("small"), &prompt).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContextTooLarge);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);

        let err = client.analyze_streaming(&document("small"), &prompt).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ContextTooLarge);
    }

    #[tokio::test]
    async fn test_api_rejection_for_length_is_context_too_large() {
        let mut fake = FakeProvider::new();
        fake.reply = Err(ProviderError::ContextLengthExceeded("prompt is too long".into()));
        let client = AnalysisClient::new(Arc::new(fake));

        let err = client.analyze(&document("doc"), "go").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContextTooLarge);
    }

    #[tokio::test]
    async fn test_missing_key_is_model_unavailable() {
        let mut fake = FakeProvider::new();
        fake.available = false;
        let fake = Arc::new(fake);
        let client = AnalysisClient::new(fake.clone());

        let err = client.analyze(&document("doc"), "go").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_retry_on_failure() {
        let mut fake = FakeProvider::new();
        fake.reply = Err(ProviderError::ServerError("overloaded".into()));
        let fake = Arc::new(fake);
        let client = AnalysisClient::new(fake.clone());

        let err = client.analyze(&document("doc"), "go").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_streaming_is_lazy_and_finite() {
        let fake = Arc::new(FakeProvider::new());
        let client = AnalysisClient::new(fake.clone());

        let stream = client.analyze_streaming(&document("doc"), "go").unwrap();
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);

        let chunks: Vec<String> = stream.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec!["Hello", ", world"]);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_streaming_error_ends_stream() {
        let mut fake = FakeProvider::new();
        fake.events = vec![
            StreamEvent::Text("partial".to_string()),
            StreamEvent::Error(ProviderError::StreamError("connection reset".into())),
            StreamEvent::Text("never".to_string()),
        ];
        let client = AnalysisClient::new(Arc::new(fake));

        let items: Vec<Result<String>> = client
            .analyze_streaming(&document("doc"), "go")
            .unwrap()
            .collect()
            .await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "partial");
        assert_eq!(items[1].as_ref().unwrap_err().kind(), ErrorKind::ModelUnavailable);
    }

    #[tokio::test]
    async fn test_dropping_stream_cancels_request() {
        let mut fake = FakeProvider::new();
        fake.events = vec![StreamEvent::Text("first".to_string())];
        let fake = Arc::new(fake);
        let client = AnalysisClient::new(fake.clone());

        let mut stream = client.analyze_streaming(&document("doc"), "go").unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), "first");
        assert!(!fake.dropped.load(Ordering::SeqCst));

        drop(stream);
        assert!(fake.dropped.load(Ordering::SeqCst));
    }
}
