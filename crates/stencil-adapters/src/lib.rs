//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil_core::ports` on top
//! of the Tera engine, and provides the configuration and logging setup an
//! embedding application needs.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod logging;
pub mod source;

// Re-export commonly used adapters
pub use crate::config::{LoggingConfig, StencilConfig, TemplatesConfig};
pub use engine::{Escaping, TeraTemplate};
pub use error::{AdapterError, AdapterResult};
pub use loader::{FilesConfig, FilesLoader};
pub use logging::init_logging;
pub use source::{LocalSource, MemorySource, TemplateSource};
