//! Configuration loading for the LLM backend and working-memory tuning.
//!
//! The canonical configuration lives in `config/llm.json`. Every field has a
//! sensible default, so a missing file degrades to those defaults rather
//! than preventing startup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_owned()
}

fn default_model() -> String {
    "gpt-4o-mini".to_owned()
}

const fn default_max_output_tokens() -> i32 {
    800
}

const fn default_perception_buffer_size() -> usize {
    30
}

const fn default_retrieval_top_k() -> usize {
    6
}

/// Working-memory tuning: how much short-term perception history and
/// long-term memory retrieval the planner's prompt assembly uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Maximum short-term-memory entries kept per agent before the oldest
    /// is popped.
    #[serde(default = "default_perception_buffer_size")]
    pub perception_buffer_size: usize,

    /// Number of scored long-term memories pulled into a planner prompt.
    #[serde(default = "default_retrieval_top_k")]
    pub retrieval_top_k: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            perception_buffer_size: default_perception_buffer_size(),
            retrieval_top_k: default_retrieval_top_k(),
        }
    }
}

/// Configuration for the LLM backend the planner calls.
///
/// Loaded from `config/llm.json`; `endpoint` and `api_key` may be overridden
/// by the `EMERGENCE_LLM_ENDPOINT` and `EMERGENCE_LLM_API_KEY` environment
/// variables so deployments never need the key checked into the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmConfig {
    /// Chat-completion endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token for the endpoint, if it requires one.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound on generated tokens per planner call, or `-1` for no cap.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: i32,

    /// Additional headers sent with every request.
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,

    /// Whether to log full prompt/response bodies at debug level.
    #[serde(default)]
    pub debug: bool,

    /// Working-memory tuning.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            max_output_tokens: default_max_output_tokens(),
            extra_headers: BTreeMap::new(),
            debug: false,
            memory: MemoryConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Load configuration from a JSON file at the given path, falling back
    /// to defaults for any field the file omits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if its content is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io { source })?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path`, or fall back to defaults entirely
    /// when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for any read failure other than a
    /// missing file, or [`ConfigError::Json`] for malformed content.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let mut config = Self::default();
            config.apply_env_overrides();
            return Ok(config);
        }
        Self::from_file(path)
    }

    /// Parse configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the string is not valid JSON.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Json { source })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("EMERGENCE_LLM_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(api_key) = std::env::var("EMERGENCE_LLM_API_KEY") {
            self.api_key = Some(api_key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_fills_in_every_default() {
        let config = LlmConfig::parse("{}").expect("valid json");
        assert_eq!(config.endpoint, default_endpoint());
        assert_eq!(config.model, default_model());
        assert_eq!(config.max_output_tokens, default_max_output_tokens());
        assert_eq!(config.memory.perception_buffer_size, 30);
        assert_eq!(config.memory.retrieval_top_k, 6);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn partial_overrides_only_replace_named_fields() {
        let config = LlmConfig::parse(r#"{"model": "local-model", "memory": {"retrieval_top_k": 10}}"#)
            .expect("valid json");
        assert_eq!(config.model, "local-model");
        assert_eq!(config.memory.retrieval_top_k, 10);
        assert_eq!(config.memory.perception_buffer_size, 30);
        assert_eq!(config.endpoint, default_endpoint());
    }

    #[test]
    fn negative_max_output_tokens_means_no_cap() {
        let config = LlmConfig::parse(r#"{"max_output_tokens": -1}"#).expect("valid json");
        assert_eq!(config.max_output_tokens, -1);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = LlmConfig::parse("not json").expect_err("should fail");
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = LlmConfig::from_file_or_default(Path::new("/nonexistent/config/llm.json"))
            .expect("default fallback");
        assert_eq!(config, LlmConfig::default());
    }
}
