//! LLM collaborator used by every loop.
//!
//! Wraps a [`Provider`] with the model settings from configuration and
//! exposes a single `complete(messages, temperature)` call. Streaming is an
//! internal detail: chunks are concatenated before returning. Every call
//! races a [`CancellationToken`] and returns [`ProviderError::Cancelled`]
//! as soon as it fires.

use agentloops_core::error::ProviderError;
use agentloops_core::message::Message;
use agentloops_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn Provider>,
    model: String,
    max_tokens: Option<u32>,
    stream: bool,
    stop: Vec<String>,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: None,
            stream: false,
            stop: Vec::new(),
        }
    }

    /// Collect the reply through the provider's streaming endpoint.
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set the max tokens per response.
    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    /// Sequences at which the model should stop generating.
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `messages` in order and return the assistant's text.
    ///
    /// A reply that is empty after trimming is reported as
    /// [`ProviderError::EmptyResponse`].
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature,
            max_tokens: self.max_tokens,
            stream: self.stream,
            stop: self.stop.clone(),
        };

        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            result = self.fetch(request) => result?,
        };

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        debug!(chars = text.len(), "LLM response received");
        Ok(text)
    }

    /// Convenience for the loops, which send one user message per turn.
    pub async fn prompt(
        &self,
        prompt: String,
        temperature: f32,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        self.complete(vec![Message::user(prompt)], temperature, cancel)
            .await
    }

    async fn fetch(&self, request: ProviderRequest) -> Result<String, ProviderError> {
        if !self.stream {
            let response = self.provider.complete(request).await?;
            return Ok(response.message.content);
        }

        let mut rx = self.provider.stream(request).await?;
        let mut text = String::new();
        while let Some(chunk) = rx.recv().await {
            let chunk = chunk?;
            if let Some(content) = chunk.content {
                text.push_str(&content);
            }
            if chunk.done {
                break;
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_helpers::SequentialMockProvider;
    use agentloops_core::error::ProviderError;
    use agentloops_core::provider::{ProviderResponse, StreamChunk};
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    /// Streams its reply in three chunks.
    struct ChunkedProvider;

    #[async_trait]
    impl Provider for ChunkedProvider {
        fn name(&self) -> &str {
            "chunked"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("complete() not used".into()))
        }

        async fn stream(
            &self,
            _request: ProviderRequest,
        ) -> Result<mpsc::Receiver<Result<StreamChunk, ProviderError>>, ProviderError> {
            let (tx, rx) = mpsc::channel(4);
            for (i, part) in ["Thought: ", "adding", "\nAction: Finish[3]"].iter().enumerate() {
                tx.send(Ok(StreamChunk {
                    content: Some(part.to_string()),
                    done: i == 2,
                    usage: None,
                }))
                .await
                .unwrap();
            }
            Ok(rx)
        }
    }

    /// Never answers.
    struct HangingProvider;

    #[async_trait]
    impl Provider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn streaming_concatenates_chunks() {
        let llm = LlmClient::new(Arc::new(ChunkedProvider), "m").with_stream(true);
        let text = llm
            .prompt("hi".into(), 0.5, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(text, "Thought: adding\nAction: Finish[3]");
    }

    #[tokio::test]
    async fn blank_reply_is_empty_response() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&["   \n"]));
        let llm = LlmClient::new(provider, "m");
        let err = llm
            .prompt("hi".into(), 0.5, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn cancellation_returns_promptly() {
        let llm = LlmClient::new(Arc::new(HangingProvider), "m");
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let err = llm.prompt("hi".into(), 0.5, &cancel).await.unwrap_err();
        assert!(matches!(err, ProviderError::Cancelled));
    }

    #[tokio::test]
    async fn request_carries_model_and_temperature() {
        let provider = Arc::new(SequentialMockProvider::from_texts(&["ok"]));
        let llm = LlmClient::new(provider.clone(), "gpt-test").with_max_tokens(Some(64));
        llm.prompt("question".into(), 0.25, &CancellationToken::new())
            .await
            .unwrap();

        let request = provider.last_request().unwrap();
        assert_eq!(request.model, "gpt-test");
        assert_eq!(request.temperature, 0.25);
        assert_eq!(request.max_tokens, Some(64));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "question");
    }
}
