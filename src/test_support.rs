//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::state::App;
use crate::inference::{
    GenerationRequest, ProviderError, SamplingConfig, Turn, TutorClient, TutorProvider,
};

/// An owned copy of a `GenerationRequest`, kept for assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub system_instruction: String,
    pub turns: Vec<Turn>,
    pub sampling: SamplingConfig,
}

/// Replays queued results in order and records every request.
/// Once the script runs out it answers `Ok(None)`.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Option<String>, ProviderError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<Option<String>, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TutorProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: request.model.to_string(),
            system_instruction: request.system_instruction.to_string(),
            turns: request.turns.to_vec(),
            sampling: request.sampling,
        });
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

/// Creates a test App whose provider answers nothing.
pub fn test_app() -> App {
    let tutor = TutorClient::new(
        Arc::new(ScriptedProvider::new(Vec::new())),
        "test-model".to_string(),
    );
    App::new(Arc::new(tutor))
}
