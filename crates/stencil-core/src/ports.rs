//! Ports (traits) implemented by templating-engine adapters.
//!
//! The dispatcher only ever talks to an engine through these two traits, so
//! an alternative engine, or a synthetic test double, can be substituted
//! without touching [`Templates`](crate::templates::Templates).
//!
//! Implemented by:
//! - `stencil_adapters::loader::FilesLoader` (Tera, layout composition)

use std::{io::Write, sync::Arc};

use serde_json::Value;

use crate::{
    error::{ExecutionError, LoadError},
    funcs::FuncMap,
};

/// A compiled, executable template. Immutable once created.
pub trait Template: Send + Sync {
    /// Render with `data`, writing the output to `out`.
    fn execute(&self, out: &mut dyn Write, data: &Value) -> Result<(), ExecutionError>;
}

/// Produces [`Template`]s by name.
pub trait Loader: Send + Sync {
    /// Load the template named `name`. A non-empty `funcs` must be made
    /// available to the returned template.
    ///
    /// Engine failures are returned unchanged; implementations neither retry
    /// nor fall back.
    fn load(&self, name: &str, funcs: &FuncMap) -> Result<Arc<dyn Template>, LoadError>;
}

impl<L: Loader + ?Sized> Loader for Arc<L> {
    fn load(&self, name: &str, funcs: &FuncMap) -> Result<Arc<dyn Template>, LoadError> {
        (**self).load(name, funcs)
    }
}

impl<L: Loader + ?Sized> Loader for Box<L> {
    fn load(&self, name: &str, funcs: &FuncMap) -> Result<Arc<dyn Template>, LoadError> {
        (**self).load(name, funcs)
    }
}
