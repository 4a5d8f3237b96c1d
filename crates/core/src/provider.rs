//! Provider trait: the abstraction over completion backends.
//!
//! A Provider knows how to send an ordered message list to a hosted model and
//! get a single text completion back. It is called once per user submission;
//! retries are not its concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ServiceError;
use crate::message::ChatMessage;

/// One completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model identifier (e.g., "llama-3.1-8b-instant")
    pub model: String,

    /// Instruction turn followed by the context window
    pub messages: Vec<ChatMessage>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text
    pub content: String,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The session calls `complete()` without knowing which backend answers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ServiceError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ServiceError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    struct Echo;

    #[async_trait]
    impl Provider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, ServiceError> {
            let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(CompletionResponse {
                content: last,
                usage: None,
                model: request.model,
            })
        }
    }

    #[test]
    fn completion_request_defaults() {
        let req = CompletionRequest::new("llama-3.1-8b-instant", vec![]);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn max_tokens_omitted_when_unset() {
        let req = CompletionRequest::new("m", vec![ChatMessage::new(Role::User, "hi")]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("max_tokens"));
    }

    #[tokio::test]
    async fn default_health_check_is_ok() {
        let echo = Echo;
        assert!(echo.health_check().await.unwrap());
        let resp = echo
            .complete(CompletionRequest::new("m", vec![ChatMessage::new(Role::User, "ping")]))
            .await
            .unwrap();
        assert_eq!(resp.content, "ping");
    }
}
