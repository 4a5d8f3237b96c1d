//! Shared test helpers for session tests.

use dost_core::error::ServiceError;
use dost_core::provider::{CompletionRequest, CompletionResponse, Provider, Usage};
use std::sync::Mutex;

/// A mock provider that plays back scripted outcomes in order and records
/// every request it receives.
///
/// Panics if more calls are made than outcomes provided.
pub struct ScriptedProvider {
    outcomes: Mutex<Vec<Result<String, ServiceError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<Result<String, ServiceError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call succeeds with the next reply.
    pub fn replies(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    /// The next `n` calls fail with a network error.
    pub fn failing(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|_| Err(ServiceError::Network("connection refused".into())))
                .collect(),
        )
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ServiceError> {
        let model = request.model.clone();
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        requests.push(request);

        let outcomes = self.outcomes.lock().unwrap();
        if call >= outcomes.len() {
            panic!(
                "ScriptedProvider: no more outcomes (call #{}, have {})",
                call,
                outcomes.len()
            );
        }

        outcomes[call].clone().map(|content| CompletionResponse {
            content,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}
