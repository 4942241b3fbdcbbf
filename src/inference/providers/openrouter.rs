//! OpenRouter provider implementation using the Responses API.
//!
//! This module uses OpenAI Responses API terminology:
//! - "input" (array of messages, not "contents")
//! - "role" of `system`, `user` or `assistant`
//! - "output" items, whose `message` entries carry `output_text` blocks
//!
//! Requests are non-streaming: one POST, one JSON body back.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::inference::provider::non_blank;
use crate::inference::{GenerationRequest, ProviderError, Turn, TurnRole, TutorProvider};

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

// ============================================================================
// OpenRouter Responses API Types
// ============================================================================

/// Role in an input message (OpenAI terminology)
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Debug)]
#[serde(tag = "type")]
enum InputItem {
    #[serde(rename = "message")]
    Message { role: Role, content: String },
}

/// Configuration for reasoning tokens
#[derive(Serialize, Debug)]
struct Reasoning {
    max_tokens: u32,
}

/// The request body for the Responses API
#[derive(Serialize, Debug)]
struct ResponsesRequest {
    model: String,
    input: Vec<InputItem>,
    stream: bool,
    temperature: f32,
    top_p: f32,
    reasoning: Reasoning,
}

#[derive(Deserialize, Debug)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize, Debug)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize, Debug)]
struct OutputContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Converts turns into Responses API input, led by the system instruction.
fn turns_to_input(system_instruction: &str, turns: &[Turn]) -> Vec<InputItem> {
    let system = InputItem::Message {
        role: Role::System,
        content: system_instruction.to_string(),
    };
    std::iter::once(system)
        .chain(turns.iter().map(|turn| InputItem::Message {
            role: match turn.role {
                TurnRole::User => Role::User,
                TurnRole::Model => Role::Assistant,
            },
            content: turn.text.clone(),
        }))
        .collect()
}

/// Joins every `output_text` block of every `message` output item.
/// Reasoning items are skipped.
fn response_text(response: ResponsesResponse) -> Option<String> {
    let text: String = response
        .output
        .into_iter()
        .filter(|item| item.item_type == "message")
        .flat_map(|item| item.content)
        .filter(|block| block.content_type == "output_text")
        .map(|block| block.text)
        .collect();
    non_blank(text)
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// OpenRouter API provider using Responses API
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TutorProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        let responses_request = ResponsesRequest {
            model: request.model.to_string(),
            input: turns_to_input(request.system_instruction, request.turns),
            stream: false,
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
            reasoning: Reasoning {
                max_tokens: request.sampling.thinking_budget,
            },
        };

        let json_body = serde_json::to_string(&responses_request)
            .map_err(|e| ProviderError::Config(format!("Request serialization failed: {e}")))?;

        info!(
            "OpenRouter Responses API request: model={}, input_count={}",
            request.model,
            responses_request.input.len(),
        );
        debug!("Raw OpenRouter request: {}", json_body);

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(json_body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("OpenRouter response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("OpenRouter API error: {} - {}", status, err_body);
            return Err(ProviderError::Api {
                status,
                message: err_body,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: ResponsesResponse =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(response_text(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_leads_input() {
        let turns = vec![
            Turn {
                role: TurnRole::User,
                text: "q".to_string(),
            },
            Turn {
                role: TurnRole::Model,
                text: "a".to_string(),
            },
        ];
        let input = turns_to_input("persona", &turns);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json[0]["type"], "message");
        assert_eq!(json[0]["role"], "system");
        assert_eq!(json[0]["content"], "persona");
        assert_eq!(json[1]["role"], "user");
        assert_eq!(json[2]["role"], "assistant");
        assert_eq!(json[2]["content"], "a");
    }

    #[test]
    fn test_response_text_skips_reasoning_items() {
        let raw = r#"{"output":[
            {"type":"reasoning","summary":[]},
            {"type":"message","role":"assistant","content":[
                {"type":"output_text","text":"Use "},
                {"type":"output_text","text":"$v = u + at$."}
            ]}
        ]}"#;
        let parsed: ResponsesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response_text(parsed), Some("Use $v = u + at$.".to_string()));
    }

    #[test]
    fn test_empty_output_is_none() {
        let parsed: ResponsesResponse = serde_json::from_str(r#"{"output":[]}"#).unwrap();
        assert_eq!(response_text(parsed), None);
    }
}
