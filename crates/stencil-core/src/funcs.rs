//! Functions made available to every loaded template.

use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;

use crate::error::FuncError;

/// A template function. Arguments are passed by name, matching the calling
/// convention of named-argument engines such as Tera.
pub type TemplateFn =
    Arc<dyn Fn(&HashMap<String, Value>) -> Result<Value, FuncError> + Send + Sync>;

/// Mapping from function name to callable.
///
/// Built once at configuration time and handed to every [`Loader::load`]
/// call by shared reference.
///
/// [`Loader::load`]: crate::ports::Loader::load
#[derive(Clone, Default)]
pub struct FuncMap {
    funcs: HashMap<String, TemplateFn>,
}

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` under `name`, replacing any previous function of that name.
    pub fn insert<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&HashMap<String, Value>) -> Result<Value, FuncError> + Send + Sync + 'static,
    {
        self.funcs.insert(name.into(), Arc::new(f));
        self
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&HashMap<String, Value>) -> Result<Value, FuncError> + Send + Sync + 'static,
    {
        self.insert(name, f);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TemplateFn> {
        self.funcs.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateFn)> {
        self.funcs.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

impl fmt::Debug for FuncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.funcs.keys().collect();
        names.sort();
        f.debug_struct("FuncMap").field("funcs", &names).finish()
    }
}
