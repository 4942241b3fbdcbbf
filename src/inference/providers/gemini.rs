//! Google Generative Language provider (`models/{model}:generateContent`).
//!
//! Gemini terminology:
//! - "contents" (the turn array), each with a "role" of `user` or `model`
//! - "systemInstruction" carries the persona out-of-band
//! - "thinkingConfig.thinkingBudget" bounds reasoning tokens

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::inference::provider::non_blank;
use crate::inference::{GenerationRequest, ProviderError, Turn, TurnRole, TutorProvider};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct Part {
    text: String,
}

#[derive(Serialize, Debug)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<TurnRole>,
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    thinking_config: ThinkingConfig,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    /// Reasoning summaries are flagged and must not reach the student.
    #[serde(default)]
    thought: bool,
}

// ============================================================================
// Translation Layer
// ============================================================================

fn turns_to_contents(turns: &[Turn]) -> Vec<Content> {
    turns
        .iter()
        .map(|turn| Content {
            role: Some(turn.role),
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        })
        .collect()
}

/// Joins the visible text parts of the first candidate.
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content?
        .parts
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();
    non_blank(text)
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// # Arguments
    /// * `api_key` - Generative Language API key
    /// * `base_url` - Optional custom base URL (defaults to Google's v1beta endpoint)
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TutorProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction.to_string(),
                }],
            },
            contents: turns_to_contents(request.turns),
            generation_config: GenerationConfig {
                temperature: request.sampling.temperature,
                top_p: request.sampling.top_p,
                thinking_config: ThinkingConfig {
                    thinking_budget: request.sampling.thinking_budget,
                },
            },
        };

        info!(
            "Gemini generateContent request: model={}, turn_count={}",
            request.model,
            body.contents.len()
        );

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, request.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Gemini response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error: {} - {}", status, err_body);
            return Err(ProviderError::Api {
                status,
                message: err_body,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let text = response_text(parsed);
        info!(
            "Gemini generation complete: {} bytes",
            text.as_ref().map_or(0, String::len)
        );
        Ok(text)
    }
}
