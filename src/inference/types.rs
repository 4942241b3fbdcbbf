use serde::Serialize;

use crate::core::message::{Message, Role};

/// Role of a turn as the remote model sees it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    #[serde(rename = "user")]
    User,
    /// The tutor's own earlier replies ("model" for Gemini, "assistant" for OpenAI-style APIs).
    #[serde(rename = "model")]
    Model,
}

impl From<Role> for TurnRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => TurnRole::User,
            Role::Assistant => TurnRole::Model,
        }
    }
}

/// A single role-tagged exchange sent to the remote model.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

/// Maps conversation history to turns, preserving order exactly.
pub fn history_to_turns(history: &[Message]) -> Vec<Turn> {
    history
        .iter()
        .map(|msg| Turn {
            role: msg.role.into(),
            text: msg.content.clone(),
        })
        .collect()
}

/// Sampling parameters. Fixed per persona, not user-configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    /// Upper bound on reasoning tokens.
    pub thinking_budget: u32,
}

pub const TUTOR_SAMPLING: SamplingConfig = SamplingConfig {
    temperature: 0.7,
    top_p: 0.95,
    thinking_budget: 4000,
};

impl Default for SamplingConfig {
    fn default() -> Self {
        TUTOR_SAMPLING
    }
}

/// Everything a provider needs to fulfill a single generation.
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub system_instruction: &'a str,
    pub turns: &'a [Turn],
    pub sampling: SamplingConfig,
}
