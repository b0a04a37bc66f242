//! Provider configuration read from the environment

/// Default OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variables checked for the API key, in order
pub const API_KEY_VARS: [&str; 2] = ["OPENAI_TOKEN", "OPENAI_API_KEY"];

/// Environment variable overriding the endpoint
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Missing or unusable configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no API key found: set OPENAI_TOKEN or OPENAI_API_KEY")]
    MissingCredential,
}

/// Credentials and endpoint for the model provider
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment
    ///
    /// # Errors
    /// Returns `ConfigError::MissingCredential` if no API key is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup
    ///
    /// # Errors
    /// Returns `ConfigError::MissingCredential` if no API key is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}
