//! Tera-backed [`Template`] implementation.
//!
//! A [`TeraTemplate`] owns a private Tera instance holding every source file
//! of one composed template (the primary file plus its layouts) and renders
//! the primary one. Inheritance (`{% extends %}` / `{% block %}`) and
//! includes are resolved by Tera across that set.

use std::{collections::HashMap, error::Error, io::Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tera::{Context, Tera};

use stencil_core::{
    error::{ExecutionError, LoadError},
    funcs::FuncMap,
    ports::Template,
};

/// Output escaping applied to `{{ ... }}` expressions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escaping {
    /// HTML-escape every expression, whatever the file suffix.
    #[default]
    Html,
    /// Plain text: nothing is escaped.
    Text,
}

impl Escaping {
    fn apply(self, tera: &mut Tera) {
        match self {
            // every name ends with ""
            Self::Html => tera.autoescape_on(vec![""]),
            Self::Text => tera.autoescape_on(Vec::new()),
        }
    }
}

/// A composed, compiled template.
#[derive(Debug)]
pub struct TeraTemplate {
    tera: Tera,
    entry: String,
}

impl TeraTemplate {
    /// Compile `sources` (`(name, content)` pairs) together; `entry` names the
    /// one that gets rendered.
    ///
    /// Functions in `funcs` are bound after parsing.
    pub fn compile<N, C>(
        sources: &[(N, C)],
        entry: &str,
        escaping: Escaping,
        funcs: &FuncMap,
    ) -> Result<Self, LoadError>
    where
        N: AsRef<str>,
        C: AsRef<str>,
    {
        let mut tera = Tera::default();
        escaping.apply(&mut tera);

        tera.add_raw_templates(
            sources
                .iter()
                .map(|(name, content)| (name.as_ref(), content.as_ref())),
        )
        .map_err(|e| LoadError::engine(flatten(&e)))?;

        bind_funcs(&mut tera, funcs);

        Ok(Self {
            tera,
            entry: entry.to_owned(),
        })
    }

    /// Name of the rendered template.
    pub fn entry(&self) -> &str {
        &self.entry
    }
}

impl Template for TeraTemplate {
    fn execute(&self, out: &mut dyn Write, data: &Value) -> Result<(), ExecutionError> {
        let context = context_for(data)?;
        self.tera
            .render_to(&self.entry, &context, out)
            .map_err(|e| ExecutionError::engine(flatten(&e)))
    }
}

/// Object data exposes its fields as top-level variables; any data is also
/// available as `data`, unless the object has a `data` field of its own.
fn context_for(data: &Value) -> Result<Context, ExecutionError> {
    let mut context = match data {
        Value::Object(_) => {
            Context::from_serialize(data).map_err(|e| ExecutionError::engine(flatten(&e)))?
        }
        _ => Context::new(),
    };
    if !context.contains_key("data") {
        context.insert("data", data);
    }
    Ok(context)
}

fn bind_funcs(tera: &mut Tera, funcs: &FuncMap) {
    for (name, func) in funcs.iter() {
        let func = func.clone();
        tera.register_function(name, move |args: &HashMap<String, Value>| {
            func(args).map_err(|e| tera::Error::msg(e.message()))
        });
    }
}

/// Tera's top-level error only says which template failed; the cause is in
/// the source chain.
fn flatten(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
