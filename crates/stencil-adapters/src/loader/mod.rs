//! Template loaders.

mod files;

pub use files::{FilesConfig, FilesLoader};
