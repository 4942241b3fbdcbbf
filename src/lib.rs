//! PhyQuest library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod inference;
pub mod tui;

#[cfg(test)]
pub mod test_support;

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum Provider {
    #[default]
    Gemini,
    #[value(name = "openrouter")]
    OpenRouter,
}

impl Provider {
    /// Name used in the config file and env vars.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenRouter => "openrouter",
        }
    }
}
