//! Adapter setup errors.
//!
//! Render-time failures are [`stencil_core::error::LoadError`] and
//! [`stencil_core::error::ExecutionError`]; these only cover building the
//! adapters (configuration and logging).

use thiserror::Error;

/// Errors raised while configuring adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The template name pattern does not contain exactly one `%s` slot.
    #[error("invalid template name pattern '{pattern}': expected exactly one '%s'")]
    InvalidPattern { pattern: String },

    /// Configuration could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Convenient result type alias.
pub type AdapterResult<T> = Result<T, AdapterError>;
