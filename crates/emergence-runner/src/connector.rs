//! The OpenAI-compatible chat-completion connector.
//!
//! A single backend shape (unlike the teacher's enum-dispatch over several
//! wire protocols) since the only transport this engine speaks to is an
//! OpenAI-compatible `/chat/completions` endpoint — local runtimes (Ollama,
//! llama.cpp servers) and hosted ones (OpenAI, OpenRouter, DeepSeek) all
//! implement it.

use std::time::Duration;

use emergence_core::config::LlmConfig;

use crate::error::ConnectorError;

/// Requests carry a generous timeout since local/hosted reasoning models may
/// think at length before responding.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Sends chat-completion requests to a configured OpenAI-compatible endpoint.
pub struct LlmConnector {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    max_output_tokens: i32,
    extra_headers: std::collections::BTreeMap<String, String>,
}

/// Whether `endpoint` looks like a hosted service rather than a local
/// runtime (Ollama, llama.cpp servers), per §6's "required when the
/// endpoint is a hosted OpenAI-compatible service".
fn is_hosted_endpoint(endpoint: &str) -> bool {
    !(endpoint.contains("localhost") || endpoint.contains("127.0.0.1") || endpoint.contains("0.0.0.0"))
}

impl LlmConnector {
    /// Build a connector from the loaded LLM configuration.
    #[must_use]
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_output_tokens: config.max_output_tokens,
            extra_headers: config.extra_headers.clone(),
        }
    }

    /// The configured endpoint, for logging.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `system` and `user` as a two-message chat completion request and
    /// return the model's text content.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::MissingApiKey`] up front if the endpoint
    /// looks hosted and no `api_key` was configured, or
    /// [`ConnectorError`] on transport failure, a non-2xx response, or a
    /// response missing every content field this connector reads.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ConnectorError> {
        if self.api_key.is_none() && is_hosted_endpoint(&self.endpoint) {
            return Err(ConnectorError::MissingApiKey {
                endpoint: self.endpoint.clone(),
            });
        }

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "response_format": {"type": "json_object"},
        });
        if self.max_output_tokens >= 0 {
            if let Some(object) = body.as_object_mut() {
                object.insert("max_tokens".to_owned(), serde_json::json!(self.max_output_tokens));
            }
        }

        let mut request = self.client.post(&self.endpoint).timeout(DEFAULT_TIMEOUT).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|source| ConnectorError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "<unreadable body>".to_owned());
            return Err(ConnectorError::Status {
                endpoint: self.endpoint.clone(),
                status,
                body,
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|source| ConnectorError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        extract_content(&json).ok_or_else(|| ConnectorError::MissingContent {
            endpoint: self.endpoint.clone(),
        })
    }
}

/// Read `choices[0].message.content`, falling back to a top-level `content`
/// or `text` field for providers that shape their response differently.
fn extract_content(json: &serde_json::Value) -> Option<String> {
    json.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(serde_json::Value::as_str)
        .or_else(|| json.get("content").and_then(serde_json::Value::as_str))
        .or_else(|| json.get("text").and_then(serde_json::Value::as_str))
        .map(ToOwned::to_owned)
}
