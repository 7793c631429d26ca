//! Process logging setup and the [`DebugLog`] sink handed to the library
//! crates.
//!
//! Output goes to stderr so stdout carries only generated text. `RUST_LOG`
//! overrides the level chosen from `--debug`.

use std::sync::Arc;

use conversation::{DebugLog, SharedLog};
use tracing_subscriber::EnvFilter;

/// Transport crates whose debug output is noise for this tool.
pub const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

fn build_filter(debug: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(directives(debug))
}

fn directives(debug: bool) -> String {
    let mut directives = String::from(if debug { "debug" } else { "warn" });
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    directives
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init_logging(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Forwards library debug notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl DebugLog for TracingLog {
    fn debug(&self, event: &str, detail: &str) {
        tracing::debug!(event, "{detail}");
    }
}

pub fn tracing_log() -> SharedLog {
    Arc::new(TracingLog)
}
