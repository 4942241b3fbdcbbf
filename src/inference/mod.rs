pub mod provider;
pub mod providers;
pub mod tutor;
pub mod types;

pub use provider::{ProviderError, TutorProvider};
pub use providers::{GeminiProvider, OpenRouterProvider};
pub use tutor::{CONNECTIVITY_ERROR_REPLY, EMPTY_GENERATION_REPLY, SYSTEM_INSTRUCTION, TutorClient};
pub use types::{GenerationRequest, SamplingConfig, TUTOR_SAMPLING, Turn, TurnRole, history_to_turns};
