//! Timeout resolution.

use std::time::Duration;

/// Hard ceiling applied to every requested timeout, whatever the default.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Default timeout for shell and interpreted runners.
pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 30;

/// Default timeout for compile-and-run runners.
pub const DEFAULT_COMPILED_TIMEOUT_SECS: u64 = 60;

/// Bound a caller-requested timeout.
///
/// Absent or non-positive requests use `default_secs`; anything above
/// [`MAX_TIMEOUT_SECS`] is clamped to it.
pub fn resolve_timeout(requested: Option<i64>, default_secs: u64) -> Duration {
    match requested {
        Some(secs) if secs > MAX_TIMEOUT_SECS as i64 => Duration::from_secs(MAX_TIMEOUT_SECS),
        Some(secs) if secs > 0 => Duration::from_secs(secs as u64),
        _ => Duration::from_secs(default_secs),
    }
}
