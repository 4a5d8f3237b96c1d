//! One interactive chat session.
//!
//! A [`ChatSession`] owns its transcript outright. Callers create it when the
//! session starts, call [`ChatSession::clear`] to reset it, and drop it when
//! the session ends. Nothing is shared between sessions.

use std::sync::Arc;
use dost_config::{AppConfig, ConfigError};
use dost_core::error::ServiceError;
use dost_core::message::{SessionId, Turn};
use dost_core::provider::{CompletionRequest, Provider};
use tracing::{debug, info, warn};

use crate::context::ContextAssembler;
use crate::transcript::Transcript;

pub struct ChatSession {
    id: SessionId,
    transcript: Transcript,
    assembler: ContextAssembler,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    error_message: String,
}

impl ChatSession {
    /// Start a session seeded with `greeting`.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        assembler: ContextAssembler,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            transcript: Transcript::new(greeting),
            assembler,
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            error_message: "Error: the reply could not be fetched. Please try again.".into(),
        }
    }

    /// Build a session from loaded configuration and a resolved model id.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let assembler = match config.instruction_override()? {
            Some(text) => ContextAssembler::new(config.context.window_size, text),
            None => ContextAssembler::with_default_instruction(config.context.window_size),
        };

        let mut session = Self::new(provider, model, assembler, config.context.greeting.clone())
            .with_temperature(config.temperature)
            .with_error_message(config.context.error_message.clone());
        session.max_tokens = config.max_tokens;
        Ok(session)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Text recorded in place of a reply when the completion call fails.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn window_size(&self) -> usize {
        self.assembler.window_size()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Point-in-time copy of every turn, for export.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.transcript.snapshot()
    }

    /// Reset the transcript to its seed greeting.
    pub fn clear(&mut self) {
        info!(session_id = %self.id, dropped = self.transcript.len() - 1, "Transcript cleared");
        self.transcript.clear();
    }

    /// Record a user turn, ask the provider once, and record the outcome.
    ///
    /// On success the reply is appended and returned. On failure a turn with
    /// the configured error text is appended in its place and the service
    /// error is returned, so the caller can show it. Either way the transcript
    /// grows by exactly two turns.
    pub async fn submit(&mut self, text: impl Into<String>) -> Result<&Turn, ServiceError> {
        self.transcript.push(Turn::user(text));

        let context = self.assembler.assemble(self.transcript.turns());
        debug!(
            session_id = %self.id,
            messages = context.messages.len(),
            window = context.metadata.window_turns,
            filtered = context.metadata.filtered_turns,
            estimated_tokens = context.metadata.estimated_tokens,
            "Context assembled"
        );

        let mut request = CompletionRequest::new(&self.model, context.messages);
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        match self.provider.complete(request).await {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    debug!(
                        session_id = %self.id,
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        "Completion usage"
                    );
                }
                Ok(self.transcript.push(Turn::assistant(response.content)))
            }
            Err(e) => {
                warn!(
                    session_id = %self.id,
                    provider = %self.provider.name(),
                    error = %e,
                    "Completion failed"
                );
                self.transcript.push(Turn::assistant(self.error_message.clone()));
                Err(e)
            }
        }
    }
}
