//! In-memory template source for embedded templates and tests.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use super::TemplateSource;

/// Thread-safe in-memory source.
///
/// Clones share the same files, so a test can keep a handle and edit a
/// template while a loader reads from another clone.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemorySource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from `(path, content)` pairs, e.g. templates embedded
    /// with `include_str!`.
    pub fn from_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let source = Self::new();
        for (path, content) in files {
            source.insert(path, content);
        }
        source
    }

    /// Add or replace the file at `path`.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), content.into());
    }

    /// Remove the file at `path`, returning its content.
    pub fn remove(&self, path: &Path) -> Option<String> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
    }

    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateSource for MemorySource {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no template source at {}", path.display()),
                )
            })
    }
}
