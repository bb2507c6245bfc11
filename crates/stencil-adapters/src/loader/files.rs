//! File-based layout-composition loader.
//!
//! A template name is turned into a file with a name pattern, and every
//! template is compiled together with a fixed list of always-included files
//! (typically shared layouts). The primary file supplies the blocks that the
//! layouts declare.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/                  ← base path
//! ├── index.html              ← pattern "%s.html", name "index"
//! ├── about.html
//! └── layouts/
//!     └── base.html           ← include "layouts/base.html"
//! ```
//!
//! `index.html` would typically start with
//! `{% extends "layouts/base.html" %}`: includes are registered under their
//! include path, the primary file under its pattern-applied name.
//!
//! Every file must stay under the base path. Names and includes that resolve
//! to a `..`, rooted or drive-prefixed path fail with
//! [`io::ErrorKind::InvalidInput`] instead of being read.

use std::{
    io,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, instrument};

use stencil_core::{
    error::LoadError,
    funcs::FuncMap,
    ports::{Loader, Template},
};

use crate::{
    engine::{Escaping, TeraTemplate},
    error::{AdapterError, AdapterResult},
    source::{LocalSource, TemplateSource},
};

/// Where the name goes in a pattern.
const SLOT: &str = "%s";

/// Name resolution and composition rules for [`FilesLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesConfig {
    pattern: String,
    base_path: PathBuf,
    includes: Vec<String>,
    escaping: Escaping,
}

impl FilesConfig {
    /// `pattern` must contain exactly one `%s`, replaced by the template name.
    pub fn new(pattern: impl Into<String>, base_path: impl Into<PathBuf>) -> AdapterResult<Self> {
        let pattern = pattern.into();
        if pattern.matches(SLOT).count() != 1 {
            return Err(AdapterError::InvalidPattern { pattern });
        }

        Ok(Self {
            pattern,
            base_path: base_path.into(),
            includes: Vec::new(),
            escaping: Escaping::default(),
        })
    }

    /// Files, relative to the base path, compiled with every template.
    pub fn with_includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = includes
            .into_iter()
            .map(|include| normalize_path(&include.into()))
            .collect();
        self
    }

    pub fn with_escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn escaping(&self) -> Escaping {
        self.escaping
    }

    /// File name of the template `name`, relative to the base path.
    pub fn template_file(&self, name: &str) -> String {
        normalize_path(&self.pattern.replacen(SLOT, name, 1))
    }

    /// Path of the primary file for `name`.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.base_path.join(self.template_file(name))
    }

    /// Primary file followed by every include, in configured order.
    pub fn template_paths(&self, name: &str) -> Vec<PathBuf> {
        self.sources(name).into_iter().map(|(_, path)| path).collect()
    }

    /// `(engine name, path)` for every file of `name`, primary first.
    fn sources(&self, name: &str) -> Vec<(String, PathBuf)> {
        let primary = self.template_file(name);
        let primary_path = self.base_path.join(&primary);

        std::iter::once((primary, primary_path))
            .chain(
                self.includes
                    .iter()
                    .map(|include| (include.clone(), self.base_path.join(include))),
            )
            .collect()
    }
}

/// Loads Tera templates composed from a primary file and the configured
/// includes.
///
/// # Example
///
/// ```no_run
/// use stencil_adapters::loader::{FilesConfig, FilesLoader};
/// use stencil_core::Templates;
///
/// let config = FilesConfig::new("%s.html", "templates")?
///     .with_includes(["layouts/base.html"]);
/// let templates = Templates::new(FilesLoader::new(config));
/// # Ok::<(), stencil_adapters::AdapterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FilesLoader<S = LocalSource> {
    config: FilesConfig,
    source: S,
}

impl FilesLoader<LocalSource> {
    /// Loader reading from the local file system.
    pub fn new(config: FilesConfig) -> Self {
        Self::with_source(config, LocalSource::new())
    }
}

impl<S: TemplateSource> FilesLoader<S> {
    /// Loader reading through `source`, e.g. a
    /// [`MemorySource`](crate::source::MemorySource) of embedded templates.
    pub fn with_source(config: FilesConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &FilesConfig {
        &self.config
    }
}

impl<S: TemplateSource> Loader for FilesLoader<S> {
    #[instrument(skip(self, funcs), fields(funcs = funcs.len()))]
    fn load(&self, name: &str, funcs: &FuncMap) -> Result<Arc<dyn Template>, LoadError> {
        let sources = self
            .config
            .sources(name)
            .into_iter()
            .map(|(engine_name, path)| {
                if !is_confined(&engine_name) {
                    let source = io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("'{engine_name}' is outside the base path"),
                    );
                    return Err(LoadError::Io { path, source });
                }
                match self.source.read(&path) {
                    Ok(content) => Ok((engine_name, content)),
                    Err(source) => Err(LoadError::Io { path, source }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let entry = self.config.template_file(name);
        let template = TeraTemplate::compile(&sources, &entry, self.config.escaping, funcs)?;

        debug!(files = sources.len(), entry = %entry, "Compiled template");
        Ok(Arc::new(template))
    }
}

/// Engine names always use forward slashes.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// `rel` names a file below the base path.
fn is_confined(rel: &str) -> bool {
    Path::new(rel)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use serde_json::json;

    fn render(loader: &impl Loader, name: &str, data: serde_json::Value) -> String {
        let template = loader.load(name, &FuncMap::new()).unwrap();
        let mut out = Vec::new();
        template.execute(&mut out, &data).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ── path resolution ───────────────────────────────────────────────────

    #[test]
    fn template_path() {
        let config = FilesConfig::new("%s.tpl", "foo/bar").unwrap();
        assert_eq!(config.template_path("spam"), PathBuf::from("foo/bar/spam.tpl"));
    }

    #[test]
    fn template_paths_primary_then_includes_in_order() {
        let config = FilesConfig::new("%s.tpl", "foo/bar")
            .unwrap()
            .with_includes(["inc/1.tpl", "inc/2.tpl"]);

        assert_eq!(
            config.template_paths("spam"),
            vec![
                PathBuf::from("foo/bar/spam.tpl"),
                PathBuf::from("foo/bar/inc/1.tpl"),
                PathBuf::from("foo/bar/inc/2.tpl"),
            ]
        );
    }

    #[test]
    fn pattern_needs_exactly_one_slot() {
        assert!(matches!(
            FilesConfig::new("page.tpl", "t"),
            Err(AdapterError::InvalidPattern { .. })
        ));
        assert!(matches!(
            FilesConfig::new("%s/%s.tpl", "t"),
            Err(AdapterError::InvalidPattern { .. })
        ));
        assert_eq!(
            FilesConfig::new("pages/%s.html", "t")
                .unwrap()
                .template_file("home"),
            "pages/home.html"
        );
    }

    #[test]
    fn include_separators_are_normalized() {
        let config = FilesConfig::new("%s.tpl", "")
            .unwrap()
            .with_includes(["layouts\\base.tpl"]);
        assert_eq!(config.includes(), ["layouts/base.tpl"]);
    }

    // ── loading ───────────────────────────────────────────────────────────

    #[test]
    fn composes_primary_with_layout() {
        let source = MemorySource::from_files([
            (
                "t/a.txt",
                r#"{% extends "layouts/base.txt" %}{% block content %}{{ data }}{% endblock content %}"#,
            ),
            ("t/layouts/base.txt", "Hello, {% block content %}{% endblock content %}!"),
        ]);
        let config = FilesConfig::new("%s.txt", "t")
            .unwrap()
            .with_includes(["layouts/base.txt"])
            .with_escaping(Escaping::Text);

        let loader = FilesLoader::with_source(config, source);
        assert_eq!(render(&loader, "a", json!("world")), "Hello, world!");
    }

    #[test]
    fn include_order_does_not_break_inheritance() {
        let source = MemorySource::from_files([
            ("page.txt", r#"{% extends "outer.txt" %}{% block b %}page{% endblock b %}"#),
            ("outer.txt", r#"{% extends "inner.txt" %}{% block a %}[{% block b %}{% endblock b %}]{% endblock a %}"#),
            ("inner.txt", "<{% block a %}{% endblock a %}>"),
        ]);
        let config = FilesConfig::new("%s.txt", "")
            .unwrap()
            .with_includes(["inner.txt", "outer.txt"])
            .with_escaping(Escaping::Text);

        let loader = FilesLoader::with_source(config, source);
        assert_eq!(render(&loader, "page", json!(null)), "<[page]>");
    }

    #[test]
    fn missing_include_is_an_io_load_error() {
        let source = MemorySource::from_files([("t/a.txt", "A")]);
        let config = FilesConfig::new("%s.txt", "t")
            .unwrap()
            .with_includes(["layouts/base.txt"]);

        let err = FilesLoader::with_source(config, source)
            .load("a", &FuncMap::new())
            .err()
            .unwrap();
        match err {
            LoadError::Io { path, .. } => assert_eq!(path, PathBuf::from("t/layouts/base.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_from_local_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hi.html"), "Hi {{ name }}").unwrap();
        let loader = FilesLoader::new(FilesConfig::new("%s.html", dir.path()).unwrap());

        assert_eq!(loader.config().base_path(), dir.path());
        assert_eq!(render(&loader, "hi", json!({"name": "<Ana>"})), "Hi &lt;Ana&gt;");
    }

    // ── confinement ───────────────────────────────────────────────────────

    /// `<tmp>/views` as base path, with `<tmp>/secret.txt` next to it.
    fn views_beside_secret() -> (tempfile::TempDir, FilesLoader) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("views")).unwrap();
        std::fs::write(dir.path().join("views/ok.txt"), "ok").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "TOP SECRET").unwrap();
        let config = FilesConfig::new("%s.txt", dir.path().join("views")).unwrap();
        (dir, FilesLoader::new(config))
    }

    fn assert_rejected(loader: &impl Loader, name: &str) {
        match loader.load(name, &FuncMap::new()) {
            Err(LoadError::Io { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput, "{source}");
            }
            Err(other) => panic!("unexpected error for {name:?}: {other}"),
            Ok(_) => panic!("{name:?} loaded from outside the base path"),
        }
    }

    #[test]
    fn parent_dir_name_is_rejected() {
        let (_dir, loader) = views_beside_secret();
        assert_rejected(&loader, "../secret");
        assert_rejected(&loader, "nested/../../secret");
        assert_eq!(render(&loader, "ok", json!(null)), "ok");
    }

    #[test]
    fn absolute_name_is_rejected() {
        let (dir, loader) = views_beside_secret();
        let absolute = dir.path().join("secret");
        assert_rejected(&loader, absolute.to_str().unwrap());
    }

    #[test]
    fn escaping_include_is_rejected() {
        let source = MemorySource::from_files([("t/a.txt", "A"), ("secret.txt", "TOP SECRET")]);
        let config = FilesConfig::new("%s.txt", "t")
            .unwrap()
            .with_includes(["../secret.txt"]);

        assert_rejected(&FilesLoader::with_source(config, source), "a");
    }

    #[test]
    fn confinement_allows_nested_and_current_dir() {
        assert!(is_confined("pages/home.html"));
        assert!(is_confined("./home.html"));
        assert!(!is_confined("../home.html"));
        assert!(!is_confined("/etc/passwd"));
    }
}
