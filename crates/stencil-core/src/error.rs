//! Error types surfaced by the cache/dispatcher.
//!
//! There are exactly two failure kinds: a template could not be loaded
//! ([`LoadError`]) or a loaded template could not be executed against the
//! supplied data ([`ExecutionError`]). [`RenderError`] is their transparent
//! union; the dispatcher never adds failure kinds of its own.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed engine error, used where the concrete type belongs to an adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A template could not be resolved or compiled.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A template source could not be read.
    #[error("failed to read template source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The templating engine rejected the sources (syntax error, broken
    /// inheritance, duplicate definition, ...).
    #[error(transparent)]
    Engine(BoxError),
}

impl LoadError {
    /// Wrap any engine error.
    pub fn engine(err: impl Into<BoxError>) -> Self {
        Self::Engine(err.into())
    }
}

/// A compiled template could not be run against the supplied data.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The data value could not be converted for the engine.
    #[error("failed to serialize template data: {0}")]
    Data(#[from] serde_json::Error),

    /// Writing rendered output to the sink failed.
    #[error("failed to write rendered output: {0}")]
    Write(#[from] std::io::Error),

    /// The engine failed while evaluating the template.
    #[error(transparent)]
    Engine(BoxError),
}

impl ExecutionError {
    /// Wrap any engine error.
    pub fn engine(err: impl Into<BoxError>) -> Self {
        Self::Engine(err.into())
    }
}

/// Failure of a render call: either kind, passed through unchanged.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl RenderError {
    /// True if the template could not be loaded.
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load(_))
    }

    /// True if the template loaded but failed to execute.
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}

/// Error returned by a template function registered in a
/// [`FuncMap`](crate::funcs::FuncMap).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FuncError {
    message: String,
}

impl FuncError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convenient result type alias for render calls.
pub type RenderResult<T> = Result<T, RenderError>;
