//! Template sources - where the text of a template file comes from.
//!
//! Implemented by:
//! - [`LocalSource`] (the real file system)
//! - [`MemorySource`] (embedded or synthetic sources, tests)

mod local;
mod memory;

pub use local::LocalSource;
pub use memory::MemorySource;

use std::{io, path::Path, sync::Arc};

/// Reads template text by path.
pub trait TemplateSource: Send + Sync {
    /// Read the whole file at `path` as UTF-8.
    fn read(&self, path: &Path) -> io::Result<String>;
}

impl<S: TemplateSource + ?Sized> TemplateSource for Arc<S> {
    fn read(&self, path: &Path) -> io::Result<String> {
        (**self).read(path)
    }
}
