#![deny(missing_docs)]
//! Shared logging utilities for the CV summarizer workspace.
//!
//! This crate provides the `cvsum_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

use std::sync::Mutex;

/// Identifier of the job the controller is currently tracking, if any.
static ACTIVE_JOB: Mutex<Option<String>> = Mutex::new(None);

/// Records the job id that log lines should be tagged with.
/// Pass `None` once the job reaches a terminal state or the controller is torn down.
pub fn set_active_job(job_id: Option<&str>) {
    if let Ok(mut slot) = ACTIVE_JOB.lock() {
        *slot = job_id.map(ToOwned::to_owned);
    }
}

/// Returns the job id log lines are currently tagged with.
pub fn active_job() -> Option<String> {
    ACTIVE_JOB.lock().ok().and_then(|slot| slot.clone())
}

/// Prefix prepended by the logging macros, e.g. `"[job 42] "`.
/// Empty when no job is active.
#[doc(hidden)]
pub fn job_prefix() -> String {
    match active_job() {
        Some(job_id) => format!("[job {job_id}] "),
        None => String::new(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! cvsum_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::job_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! cvsum_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::job_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! cvsum_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::job_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! cvsum_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::job_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! cvsum_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::job_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_follows_active_job() {
        set_active_job(Some("abc-123"));
        assert_eq!(active_job().as_deref(), Some("abc-123"));
        assert_eq!(job_prefix(), "[job abc-123] ");

        set_active_job(None);
        assert_eq!(active_job(), None);
        assert_eq!(job_prefix(), "");
    }
}
