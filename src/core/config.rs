//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.phyquest/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! The tutoring persona and sampling settings are constants of the tutor
//! and cannot be configured here.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::inference::providers::gemini::DEFAULT_GEMINI_BASE_URL;
use crate::inference::providers::openrouter::DEFAULT_OPENROUTER_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PhyQuestConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// OpenRouter model IDs carry a vendor prefix.
pub const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.5-flash";

/// Provider names `resolve` accepts. Anything else falls back to the default.
const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "openrouter"];

fn default_model(provider: &str) -> &'static str {
    match provider {
        "openrouter" => DEFAULT_OPENROUTER_MODEL,
        _ => DEFAULT_GEMINI_MODEL,
    }
}

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: String,
    pub model_name: String,
    /// `None` when no credential was found; requests will then fail auth
    /// and surface as the connectivity reply.
    pub api_key: Option<String>,
    pub base_url: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.phyquest/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".phyquest").join("config.toml"))
}

/// Load config from `~/.phyquest/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PhyQuestConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PhyQuestConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PhyQuestConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<PhyQuestConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(PhyQuestConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PhyQuestConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Debug output would leak API keys into the log file.
    debug!(
        "Config: provider={:?}, model={:?}",
        config.general.provider, config.general.model
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# PhyQuest Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# provider = "gemini"                 # "gemini" or "openrouter"
# model = "gemini-2.5-flash"          # openrouter default: "google/gemini-2.5-flash"

# [gemini]
# api_key = "AIza..."                  # Or set GEMINI_API_KEY env var
# base_url = "https://generativelanguage.googleapis.com/v1beta"

# [openrouter]
# api_key = "sk-or-..."                # Or set OPENROUTER_API_KEY env var
# base_url = "https://openrouter.ai/api/v1"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_provider` and `cli_model` are from CLI flags (None = not specified).
pub fn resolve(
    config: &PhyQuestConfig,
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
) -> ResolvedConfig {
    resolve_with_env(config, cli_provider, cli_model, |key| std::env::var(key).ok())
}

/// Same as `resolve`, with the environment lookup injected.
pub fn resolve_with_env(
    config: &PhyQuestConfig,
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let requested = cli_provider
        .map(|s| s.to_string())
        .or_else(|| env("PHYQUEST_PROVIDER"))
        .or_else(|| config.general.provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    let provider = normalize_provider(&requested);

    // Model: CLI → env → config → provider default
    let model_name = cli_model
        .map(|s| s.to_string())
        .or_else(|| env("PHYQUEST_MODEL"))
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| default_model(&provider).to_string());

    let (api_key, base_url) = match provider.as_str() {
        "openrouter" => (
            env("OPENROUTER_API_KEY").or_else(|| config.openrouter.api_key.clone()),
            env("OPENROUTER_BASE_URL")
                .or_else(|| config.openrouter.base_url.clone())
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
        ),
        _ => (
            env("GEMINI_API_KEY")
                .or_else(|| env("API_KEY"))
                .or_else(|| config.gemini.api_key.clone()),
            env("GEMINI_BASE_URL")
                .or_else(|| config.gemini.base_url.clone())
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        ),
    };

    if api_key.is_none() {
        warn!("No API key configured for provider '{}'", provider);
    }

    ResolvedConfig {
        provider,
        model_name,
        api_key,
        base_url,
    }
}

fn normalize_provider(requested: &str) -> String {
    let name = requested.trim().to_ascii_lowercase();
    if KNOWN_PROVIDERS.contains(&name.as_str()) {
        name
    } else {
        warn!(
            "Unknown provider '{}', falling back to {}",
            requested, DEFAULT_PROVIDER
        );
        DEFAULT_PROVIDER.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = PhyQuestConfig::default();
        let resolved = resolve_with_env(&config, None, None, no_env);
        assert_eq!(resolved.provider, DEFAULT_PROVIDER);
        assert_eq!(resolved.model_name, DEFAULT_GEMINI_MODEL);
        assert_eq!(resolved.base_url, DEFAULT_GEMINI_BASE_URL);
        assert!(resolved.api_key.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = PhyQuestConfig {
            general: GeneralConfig {
                provider: Some("openrouter".to_string()),
                model: Some("google/gemini-2.5-flash".to_string()),
            },
            openrouter: ProviderConfig {
                api_key: Some("sk-or-test".to_string()),
                base_url: None,
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, None, None, no_env);
        assert_eq!(resolved.provider, "openrouter");
        assert_eq!(resolved.model_name, "google/gemini-2.5-flash");
        assert_eq!(resolved.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(resolved.base_url, DEFAULT_OPENROUTER_BASE_URL);
    }

    #[test]
    fn test_env_overrides_config_and_cli_overrides_env() {
        let config = PhyQuestConfig {
            general: GeneralConfig {
                provider: Some("openrouter".to_string()),
                model: Some("from-config".to_string()),
            },
            gemini: ProviderConfig {
                api_key: Some("config-key".to_string()),
                base_url: None,
            },
            ..Default::default()
        };
        let env: HashMap<&str, &str> = [
            ("PHYQUEST_PROVIDER", "gemini"),
            ("PHYQUEST_MODEL", "from-env"),
            ("GEMINI_API_KEY", "env-key"),
        ]
        .into_iter()
        .collect();
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());

        let resolved = resolve_with_env(&config, None, None, lookup);
        assert_eq!(resolved.provider, "gemini");
        assert_eq!(resolved.model_name, "from-env");
        assert_eq!(resolved.api_key.as_deref(), Some("env-key"));

        let resolved = resolve_with_env(&config, None, Some("from-cli"), lookup);
        assert_eq!(resolved.model_name, "from-cli");
    }

    #[test]
    fn test_legacy_api_key_env_var() {
        let config = PhyQuestConfig::default();
        let resolved = resolve_with_env(&config, None, None, |k| {
            (k == "API_KEY").then(|| "legacy".to_string())
        });
        assert_eq!(resolved.api_key.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_openrouter_default_model_has_vendor_prefix() {
        let config = PhyQuestConfig::default();
        let resolved = resolve_with_env(&config, Some("openrouter"), None, no_env);
        assert_eq!(resolved.provider, "openrouter");
        assert_eq!(resolved.model_name, DEFAULT_OPENROUTER_MODEL);
        assert!(resolved.model_name.contains('/'));
        assert_eq!(resolved.base_url, DEFAULT_OPENROUTER_BASE_URL);
    }

    #[test]
    fn test_explicit_model_kept_for_openrouter() {
        let config = PhyQuestConfig::default();
        let resolved = resolve_with_env(
            &config,
            Some("openrouter"),
            Some("anthropic/claude-sonnet-4"),
            no_env,
        );
        assert_eq!(resolved.model_name, "anthropic/claude-sonnet-4");
    }

    #[test]
    fn test_unknown_provider_normalized_to_default() {
        let config = PhyQuestConfig::default();
        let resolved = resolve_with_env(&config, None, None, |k| {
            (k == "PHYQUEST_PROVIDER").then(|| "lmstudio".to_string())
        });
        assert_eq!(resolved.provider, DEFAULT_PROVIDER);
        assert_eq!(resolved.model_name, DEFAULT_GEMINI_MODEL);
        assert_eq!(resolved.base_url, DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn test_provider_name_case_insensitive() {
        let config = PhyQuestConfig::default();
        let resolved = resolve_with_env(&config, None, None, |k| {
            (k == "PHYQUEST_PROVIDER").then(|| " OpenRouter ".to_string())
        });
        assert_eq!(resolved.provider, "openrouter");
    }

    #[test]
    fn test_resolve_cli_provider_wins() {
        let config = PhyQuestConfig {
            general: GeneralConfig {
                provider: Some("openrouter".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, Some("gemini"), None, no_env);
        assert_eq!(resolved.provider, "gemini");
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[general]
provider = "gemini"
model = "gemini-2.5-pro"

[gemini]
api_key = "AIza-test"

[openrouter]
base_url = "http://localhost:9000/v1"
"#;
        let config: PhyQuestConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.provider.as_deref(), Some("gemini"));
        assert_eq!(config.general.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test"));
        assert_eq!(
            config.openrouter.base_url.as_deref(),
            Some("http://localhost:9000/v1")
        );
        assert!(config.openrouter.api_key.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing. Everything else stays default.
        let config: PhyQuestConfig = toml::from_str("[general]\nmodel = \"m\"\n").unwrap();
        assert_eq!(config.general.model.as_deref(), Some("m"));
        assert!(config.general.provider.is_none());
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("phyquest-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[general\nprovider = ").unwrap();
        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("phyquest-gen-{}", std::process::id()));
        let path = dir.join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.general.provider.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# PhyQuest Configuration"));
        // The generated file is all comments and must parse as empty.
        let reparsed: PhyQuestConfig = toml::from_str(&written).unwrap();
        assert!(reparsed.general.model.is_none());
        fs::remove_dir_all(&dir).unwrap();
    }
}
