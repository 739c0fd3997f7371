//! Failure modes for a single LLM connector call.
//!
//! The planner protocol is infallible by contract ([`crate::planner::LlmPlanner`]
//! never returns a `Result`); these errors exist only to carry a reason into a
//! `tracing::warn!` before the three-stage protocol falls through to its next
//! stage or, ultimately, the `wait` fallback.

/// Everything that can go wrong sending one chat-completion request.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// The HTTP transport failed outright (connection refused, DNS, TLS, the
    /// request timeout elapsing, ...).
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        /// The endpoint that was being called.
        endpoint: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint responded, but not with a 2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        /// The endpoint that was called.
        endpoint: String,
        /// The non-success HTTP status.
        status: reqwest::StatusCode,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The response body parsed as JSON but carried none of the content
    /// fields this connector knows how to read.
    #[error("response from {endpoint} had no choices[0].message.content, content, or text field")]
    MissingContent {
        /// The endpoint that was called.
        endpoint: String,
    },

    /// `endpoint` looks like a hosted OpenAI-compatible service but no
    /// `api_key` was configured; the request is rejected before it is sent
    /// rather than going out unauthenticated.
    #[error("{endpoint} is a hosted endpoint and requires an api_key")]
    MissingApiKey {
        /// The endpoint that was being called.
        endpoint: String,
    },
}
