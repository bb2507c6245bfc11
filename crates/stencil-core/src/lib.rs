//! Stencil Core - cached template dispatch
//!
//! This crate owns the engine-independent half of Stencil: the [`Template`]
//! and [`Loader`] ports, and [`Templates`], the cache/dispatcher that sits in
//! front of them.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        application / HTTP handler       │
//! └──────────────────┬──────────────────────┘
//!                    │ render / render_http
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │               Templates                 │
//! │   (name → template cache, devel mode)   │
//! └──────────────────┬──────────────────────┘
//!                    │ load (on miss, or always in devel mode)
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Ports (Loader, Template)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stencil-adapters (Tera FilesLoader)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stencil_core::prelude::*;
//! # fn loader() -> Box<dyn Loader> { unimplemented!() }
//!
//! let templates = Templates::new(loader()).with_devel_mode(false);
//!
//! let mut out = Vec::new();
//! templates.render(&mut out, "index", &serde_json::json!({ "title": "Home" }))?;
//!
//! let response = templates.render_response("index", &serde_json::json!({}));
//! # Ok::<(), RenderError>(())
//! ```

pub mod error;
pub mod funcs;
pub mod ports;
pub mod response;
pub mod templates;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::error::{ExecutionError, FuncError, LoadError, RenderError, RenderResult};
    pub use crate::funcs::{FuncMap, TemplateFn};
    pub use crate::ports::{Loader, Template};
    pub use crate::response::ResponseSink;
    pub use crate::templates::Templates;
}

pub use prelude::*;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
