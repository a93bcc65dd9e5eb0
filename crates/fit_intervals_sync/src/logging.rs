//! Log filter set up for the binary.

use tracing_subscriber::EnvFilter;

/// Directives appended to every filter so HTTP internals stay quiet unless
/// asked for explicitly.
pub const QUIET_TARGETS: &str = "hyper=warn,reqwest=warn";

/// `FIT_SYNC_LOG_LEVEL`, else `RUST_LOG`, else `info`.
pub fn log_level<F>(mut get: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    get("FIT_SYNC_LOG_LEVEL")
        .or_else(|| get("RUST_LOG"))
        .unwrap_or_else(|| "info".to_string())
}

/// Filter for `level` plus [`QUIET_TARGETS`]. A level that does not parse
/// falls back to `info`.
pub fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("{level},{QUIET_TARGETS}"))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_TARGETS}")))
}
