//! Client configuration

use std::time::Duration;

use crate::{LlmError, Result};

const DEFAULT_API_BASE: &str = "https://api.fireworks.ai/inference/v1";
const DEFAULT_MODEL: &str = "accounts/fireworks/models/deepseek-v3p1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for [`crate::ChatClient`]
///
/// Defaults target the hosted inference endpoint the dashboard uses, but any
/// OpenAI-compatible chat-completions API works through `with_api_base`.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Bearer token for authentication
    pub api_key: String,
    /// Base URL of the inference API
    pub api_base: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ChatConfig {
    /// Create a config with the given API key and default endpoint/model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a config from environment variables
    ///
    /// Reads the API key from `FIREWORKS_API_KEY`; `FIREWORKS_API_BASE` and
    /// `FIREWORKS_MODEL` override the endpoint and model when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FIREWORKS_API_KEY").map_err(|_| {
            LlmError::Configuration("FIREWORKS_API_KEY environment variable not set".to_string())
        })?;

        let mut config = Self::new(api_key);
        if let Ok(base) = std::env::var("FIREWORKS_API_BASE") {
            config.api_base = base;
        }
        if let Ok(model) = std::env::var("FIREWORKS_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Set a custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::new("key");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ChatConfig::new("key")
            .with_api_base("http://localhost:8000/v1")
            .with_model("local-model")
            .with_timeout(30);
        assert_eq!(config.api_base, "http://localhost:8000/v1");
        assert_eq!(config.model, "local-model");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_env_without_key() {
        unsafe {
            std::env::remove_var("FIREWORKS_API_KEY");
        }
        let result = ChatConfig::from_env();
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }
}
