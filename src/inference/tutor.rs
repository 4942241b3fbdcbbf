//! # Tutoring Client
//!
//! Sends the whole conversation to the remote model with the fixed
//! PhyQuest persona and sampling settings, and always answers with text.
//!
//! ```text
//! history ──► turns ──► provider.generate() ──► Ok(Some(text)) ──► text
//!                                          ├──► Ok(None)       ──► EMPTY_GENERATION_REPLY
//!                                          └──► Err(e)         ──► CONNECTIVITY_ERROR_REPLY
//! ```
//!
//! Callers never branch on success vs failure: a failure is just another
//! assistant message.

use std::sync::Arc;

use log::{error, info, warn};

use crate::core::message::Message;
use crate::inference::{GenerationRequest, TUTOR_SAMPLING, TutorProvider, history_to_turns};

pub const EMPTY_GENERATION_REPLY: &str =
    "I'm sorry, I couldn't process that physics problem. Could you try rephrasing it?";

pub const CONNECTIVITY_ERROR_REPLY: &str =
    "Error: I'm having trouble connecting to my brain. Please check your connection and try again.";

pub const SYSTEM_INSTRUCTION: &str = r#"You are "PhyQuest", a world-class Physics Tutor specifically for 11th-grade students (approx. 16-17 years old).
Your goal is to help them solve physics problems while ensuring they understand the underlying concepts.

Follow these rules:
1. FORMATTING: Always use LaTeX for mathematical formulas, constants, and variables.
   - Inline math: use single dollar signs, e.g., $E = mc^2$.
   - Block math: use double dollar signs, e.g., $$v = u + at$$.
2. STEP-BY-STEP: When solving a problem, use a structured approach:
   - **Identify Given Information**: Extract values and units from the prompt.
   - **Determine the Goal**: State what needs to be found.
   - **Relevant Principles**: Explain the laws or theories involved (e.g., Newton's Second Law).
   - **Step-by-Step Solution**: Show every algebraic step clearly.
   - **Final Answer**: Highlight the result with units.
   - **Conceptual Intuition**: Briefly explain why the answer makes sense physically.
3. TONE: Be patient, encouraging, and academic yet accessible. Use analogies for difficult concepts.
4. SOCRATIC METHOD: If a student asks a vague question, ask clarifying questions or guide them to the first step rather than just giving the final answer immediately.
5. TOPICS: Focus on 11th-grade curriculum (Kinematics, Dynamics, Energy, Momentum, Circular Motion, Gravitation, Oscillations, Waves, Thermodynamics).
6. VISUAL DESCRIPTIONS: Since you are text-based, describe diagrams clearly (e.g., "Imagine a free-body diagram where the force vector F points 30 degrees above the horizontal...").

Respond in Markdown format."#;

pub struct TutorClient {
    provider: Arc<dyn TutorProvider>,
    model: String,
}

impl TutorClient {
    pub fn new(provider: Arc<dyn TutorProvider>, model: String) -> Self {
        Self { provider, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Returns the tutor's reply to `history`, or one of the canned
    /// fallback replies. Never returns an empty string and never fails.
    ///
    /// Performs exactly one provider call: no retry, no caching.
    pub async fn get_tutor_response(&self, history: &[Message]) -> String {
        if history.is_empty() {
            warn!("Tutor request with empty history");
        }
        let turns = history_to_turns(history);
        let request = GenerationRequest {
            model: &self.model,
            system_instruction: SYSTEM_INSTRUCTION,
            turns: &turns,
            sampling: TUTOR_SAMPLING,
        };

        match self.provider.generate(request).await {
            Ok(Some(text)) if !text.trim().is_empty() => {
                info!(
                    "Tutor reply from {} ({} bytes)",
                    self.provider.name(),
                    text.len()
                );
                text
            }
            Ok(_) => {
                warn!("{} returned an empty generation", self.provider.name());
                EMPTY_GENERATION_REPLY.to_string()
            }
            Err(e) => {
                error!("{} API error: {}", self.provider.name(), e);
                CONNECTIVITY_ERROR_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{MessageId, Role};
    use crate::inference::{ProviderError, TurnRole};
    use crate::test_support::ScriptedProvider;
    use chrono::Utc;

    fn user(content: &str) -> Message {
        Message::new(MessageId(1), Role::User, content.to_string(), Utc::now())
    }

    fn client(provider: &Arc<ScriptedProvider>) -> TutorClient {
        TutorClient::new(provider.clone(), "test-model".to_string())
    }

    #[test]
    fn test_success_returns_generated_text() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(Some(
            "The force is **10N**.".to_string(),
        ))]));
        let reply = tokio_test::block_on(client(&provider).get_tutor_response(&[user("F?")]));
        assert_eq!(reply, "The force is **10N**.");
    }

    #[test]
    fn test_empty_generation_returns_clarification() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(None)]));
        let reply = tokio_test::block_on(client(&provider).get_tutor_response(&[user("hm")]));
        assert_eq!(reply, EMPTY_GENERATION_REPLY);
    }

    #[test]
    fn test_whitespace_generation_returns_clarification() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(Some("  \n ".to_string()))]));
        let reply = tokio_test::block_on(client(&provider).get_tutor_response(&[user("hm")]));
        assert_eq!(reply, EMPTY_GENERATION_REPLY);
    }

    #[test]
    fn test_failure_returns_connectivity_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Network(
            "connection refused".to_string(),
        ))]));
        let reply = tokio_test::block_on(client(&provider).get_tutor_response(&[user("F?")]));
        assert_eq!(reply, CONNECTIVITY_ERROR_REPLY);
        assert!(!reply.contains("connection refused"));
    }

    #[test]
    fn test_request_carries_history_persona_and_sampling() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(Some("ok".to_string()))]));
        let history = vec![
            user("first"),
            Message::new(MessageId(2), Role::Assistant, "reply".to_string(), Utc::now()),
            Message::new(MessageId(3), Role::User, "second".to_string(), Utc::now()),
        ];
        tokio_test::block_on(client(&provider).get_tutor_response(&history));

        let calls = provider.recorded();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.model, "test-model");
        assert_eq!(call.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(call.sampling, TUTOR_SAMPLING);
        let roles: Vec<_> = call.turns.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![TurnRole::User, TurnRole::Model, TurnRole::User]);
        assert_eq!(call.turns[2].text, "second");
    }

    #[test]
    fn test_persona_mentions_latex_delimiters() {
        assert!(SYSTEM_INSTRUCTION.contains("$E = mc^2$"));
        assert!(SYSTEM_INSTRUCTION.contains("$$v = u + at$$"));
        assert!(SYSTEM_INSTRUCTION.ends_with("Respond in Markdown format."));
    }
}
