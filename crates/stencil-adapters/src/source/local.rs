//! Local file system source using std::fs.

use std::{io, path::Path};

use super::TemplateSource;

/// Production source reading files with `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalSource;

impl LocalSource {
    /// Create a new local file system source.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSource for LocalSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "Hello").unwrap();

        assert_eq!(LocalSource::new().read(&path).unwrap(), "Hello");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalSource::new()
            .read(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
