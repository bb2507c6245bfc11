//! Configuration for embedding applications.
//!
//! [`StencilConfig`] is loaded once at startup and turned into a ready
//! [`Templates`] with [`StencilConfig::build_templates`].
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables: `STENCIL_` prefix, `__` between nested keys
//!    (`STENCIL_DEVEL_MODE=true`, `STENCIL_TEMPLATES__BASE_PATH=views`)
//! 2. Config file, if given (format picked from its extension)
//! 3. Built-in defaults (always present)
//!
//! ```toml
//! devel_mode = true
//!
//! [templates]
//! pattern   = "%s.html"
//! base_path = "templates"
//! includes  = ["layouts/base.html"]
//! escaping  = "html"              # html | text
//!
//! [logging]
//! level = "info"
//! color = true
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use stencil_core::{funcs::FuncMap, templates::Templates};

use crate::{
    engine::Escaping,
    error::AdapterResult,
    loader::{FilesConfig, FilesLoader},
};

const ENV_PREFIX: &str = "STENCIL";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StencilConfig {
    /// Reload templates on every render and show render errors to clients.
    pub devel_mode: bool,
    /// Template file settings.
    pub templates: TemplatesConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub pattern: String,
    pub base_path: PathBuf,
    pub includes: Vec<String>,
    pub escaping: Escaping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub level: String,
    /// Colour output when stderr is a terminal.
    pub color: bool,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            pattern: "%s.html".into(),
            base_path: PathBuf::from("templates"),
            includes: Vec::new(),
            escaping: Escaping::Html,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            color: true,
        }
    }
}

impl StencilConfig {
    /// Load configuration from defaults, the optional `config_file` and the
    /// process environment.
    pub fn load(config_file: Option<&Path>) -> AdapterResult<Self> {
        Self::load_with_env(config_file, None)
    }

    /// Like [`load`](Self::load), reading variables from `env` instead of the
    /// process environment when it is `Some`.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> AdapterResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validated loader configuration.
    pub fn files_config(&self) -> AdapterResult<FilesConfig> {
        let templates = &self.templates;
        Ok(
            FilesConfig::new(templates.pattern.clone(), templates.base_path.clone())?
                .with_includes(templates.includes.iter().cloned())
                .with_escaping(templates.escaping),
        )
    }

    /// [`Templates`] reading from the local file system, with `funcs`
    /// available to every template.
    pub fn build_templates(&self, funcs: FuncMap) -> AdapterResult<Templates> {
        let files = self.files_config()?;

        info!(
            devel_mode = self.devel_mode,
            base_path = %files.base_path().display(),
            pattern = files.pattern(),
            includes = files.includes().len(),
            "Configured templates"
        );

        Ok(Templates::new(FilesLoader::new(files))
            .with_devel_mode(self.devel_mode)
            .with_funcs(funcs))
    }
}
