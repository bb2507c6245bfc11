//! Tracing subscriber initialisation.
//!
//! Stencil's crates only *emit* spans and events. Applications that have no
//! subscriber of their own can install one with [`init_logging`].
//!
//! # Level mapping
//!
//! | `logging.level`      | Filter             |
//! |----------------------|--------------------|
//! | `error` ... `trace`  | that level         |
//! | `off`                | nothing            |
//! | anything else        | WARN               |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::LoggingConfig,
    error::{AdapterError, AdapterResult},
};

/// Initialise the global tracing subscriber.
///
/// Returns an error if a subscriber is already set (e.g. by a previous call
/// in the same process).
pub fn init_logging(config: &LoggingConfig) -> AdapterResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level)));

    let use_ansi = config.color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AdapterError::Logging(e.to_string()))
}

/// Filter giving both Stencil crates the same level.
pub fn filter_directive(level: &str) -> String {
    let level = derive_level(level);
    format!("stencil_core={level},stencil_adapters={level}")
}

fn derive_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => "off",
        "error" => "error",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        _ => "warn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_known() {
        assert_eq!(derive_level("error"), "error");
        assert_eq!(derive_level("info"), "info");
        assert_eq!(derive_level("trace"), "trace");
        assert_eq!(derive_level("off"), "off");
    }

    #[test]
    fn level_is_case_insensitive() {
        assert_eq!(derive_level(" DEBUG "), "debug");
    }

    #[test]
    fn level_unknown_falls_back_to_warn() {
        assert_eq!(derive_level(""), "warn");
        assert_eq!(derive_level("verbose"), "warn");
    }

    #[test]
    fn directive_covers_both_crates() {
        assert_eq!(
            filter_directive("info"),
            "stencil_core=info,stencil_adapters=info"
        );
    }
}
