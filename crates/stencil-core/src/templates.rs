//! Templates - loading, caching and execution of named templates.
//!
//! In production mode every template is loaded on first use and then served
//! from an in-memory cache for the lifetime of the [`Templates`] value. In
//! development mode the cache is bypassed and every render reloads the
//! template, so edits show up without a restart.

use std::{
    collections::HashMap,
    fmt,
    io::Write,
    sync::{Arc, PoisonError, RwLock},
};

use http::{
    HeaderValue, Response,
    header::{CONTENT_LENGTH, CONTENT_TYPE},
};
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::{
    error::{ExecutionError, LoadError, RenderResult},
    funcs::FuncMap,
    ports::{Loader, Template},
    response::ResponseSink,
};

const TEXT_HTML: &str = "text/html";
const TEXT_PLAIN: &str = "text/plain";

/// Loads, caches and executes named templates.
///
/// `Templates` is `Send + Sync`; share it (e.g. behind an `Arc`) between all
/// request handlers.
pub struct Templates {
    devel_mode: bool,
    funcs: FuncMap,
    loader: Box<dyn Loader>,
    cache: RwLock<HashMap<String, Arc<dyn Template>>>,
}

impl Templates {
    /// Create production-mode templates backed by `loader`, with no functions.
    pub fn new(loader: impl Loader + 'static) -> Self {
        Self {
            devel_mode: false,
            funcs: FuncMap::new(),
            loader: Box::new(loader),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Switch development mode on or off.
    ///
    /// Development mode reloads templates on every render and turns render
    /// failures in [`render_http`](Self::render_http) into visible diagnostics.
    pub fn with_devel_mode(mut self, devel_mode: bool) -> Self {
        self.devel_mode = devel_mode;
        self
    }

    /// Functions passed to the loader with every load.
    pub fn with_funcs(mut self, funcs: FuncMap) -> Self {
        self.funcs = funcs;
        self
    }

    pub fn is_devel_mode(&self) -> bool {
        self.devel_mode
    }

    pub fn funcs(&self) -> &FuncMap {
        &self.funcs
    }

    /// Whether a compiled template is cached under `name`.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Number of cached templates.
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Execute the template named `name` with `data`, writing the output to
    /// `out`.
    ///
    /// Returns any error produced by the loader or by template execution,
    /// unchanged.
    #[instrument(skip_all, fields(template = %name, devel = self.devel_mode))]
    pub fn render<W, T>(&self, out: &mut W, name: &str, data: &T) -> RenderResult<()>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized,
    {
        let template = self.resolve(name)?;
        let data = serde_json::to_value(data).map_err(ExecutionError::from)?;
        let mut out = out;
        template.execute(&mut out, &data)?;
        Ok(())
    }

    /// Render `name` as an HTML response.
    ///
    /// Output is buffered, so a failing render never leaves a partial body.
    /// On success `content-type: text/html` and `content-length` are set and
    /// the buffer becomes the body. On failure in development mode the body is
    /// a plain-text diagnostic; in production mode the error is logged and the
    /// response is an empty HTML body. The status is never set.
    pub fn render_http<R, T>(&self, response: &mut R, name: &str, data: &T)
    where
        R: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        let mut buf = Vec::new();

        if let Err(err) = self.render(&mut buf, name, data) {
            if self.devel_mode {
                let diagnostic = format!("Failed to render template '{name}': {err}");
                send(response, name, TEXT_PLAIN, diagnostic.as_bytes());
                return;
            }

            error!(template = name, error = %err, "Error rendering template");
            buf.clear();
        }

        send(response, name, TEXT_HTML, &buf);
    }

    /// Like [`render_http`](Self::render_http), but builds the response.
    pub fn render_response<T>(&self, name: &str, data: &T) -> Response<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let mut response = Response::new(Vec::new());
        self.render_http(&mut response, name, data);
        response
    }

    /// Resolve `name` to a compiled template.
    ///
    /// Development mode always delegates to the loader. Production mode uses
    /// a double-checked lookup: hits only take the shared lock; a miss takes
    /// the exclusive lock, re-checks, and loads while holding it. Only
    /// successful loads are cached.
    fn resolve(&self, name: &str) -> Result<Arc<dyn Template>, LoadError> {
        if self.devel_mode {
            debug!(template = name, "Loading template (cache bypassed)");
            return self.loader.load(name, &self.funcs);
        }

        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        if let Some(template) = cached {
            return Ok(template);
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(template) = cache.get(name) {
            debug!(template = name, "Template loaded by a concurrent caller");
            return Ok(Arc::clone(template));
        }

        debug!(template = name, "Loading template");
        let template = self.loader.load(name, &self.funcs)?;
        cache.insert(name.to_owned(), Arc::clone(&template));

        Ok(template)
    }
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("devel_mode", &self.devel_mode)
            .field("funcs", &self.funcs)
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}

fn send<R>(response: &mut R, name: &str, content_type: &'static str, body: &[u8])
where
    R: ResponseSink + ?Sized,
{
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));

    if let Err(err) = response.write_body(body) {
        warn!(template = name, error = %err, "Failed to write response body");
    }
}
