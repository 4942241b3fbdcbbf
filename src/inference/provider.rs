use std::fmt;

use async_trait::async_trait;

use super::types::GenerationRequest;

/// Errors that can occur during provider operations.
/// The tutoring client collapses all of them into one user-facing reply.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (bad URL, unserializable request).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response (including auth failures).
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

#[async_trait]
pub trait TutorProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Performs exactly one generation call.
    ///
    /// `Ok(None)` means the service answered but produced no text.
    async fn generate(&self, request: GenerationRequest<'_>)
    -> Result<Option<String>, ProviderError>;
}

/// Converts an empty or whitespace-only generation to None.
pub(crate) fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_api_error() {
        let err = ProviderError::Api {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 403): forbidden");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  \n".to_string()), None);
        assert_eq!(non_blank("x".to_string()), Some("x".to_string()));
    }
}
