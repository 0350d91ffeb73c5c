//! Diagnostic logging on stderr.
//!
//! Verbosity comes from `RTIMETRACK_LOG`, then `RUST_LOG`, default `warn`.
//! `RTIMETRACK_DEBUG_LOG=1` forces `debug`. Stdout is left alone so that
//! `--json` output stays machine-readable.

use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

fn debug_forced() -> bool {
    env::var("RTIMETRACK_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

fn build_filter() -> EnvFilter {
    if debug_forced() {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env("RTIMETRACK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
