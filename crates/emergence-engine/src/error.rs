//! Error types for the World Engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup.

/// Top-level error for the World Engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Loading `config/llm.json` failed.
    #[error("config error: {0}")]
    Config(#[from] emergence_core::config::ConfigError),

    /// Loading the on-disk world data (`data/`) failed.
    #[error("world load error: {0}")]
    WorldLoad(#[from] emergence_world::LoadError),

    /// The Observer API server failed to start or exited with an error.
    #[error("observer error: {0}")]
    Observer(#[from] emergence_observer::ServerError),
}
