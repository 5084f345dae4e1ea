#![deny(missing_docs)]
//! Shared logging utilities for the recap workspace.
//!
//! This crate provides the `recap_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

/// Log target used by every `recap_*` macro, so the whole client can be
/// filtered with a single target in simplelog configs.
pub const TARGET: &str = "recap";

/// Logs a trace-level message under the `recap` target.
#[macro_export]
macro_rules! recap_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the `recap` target.
#[macro_export]
macro_rules! recap_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the `recap` target.
#[macro_export]
macro_rules! recap_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the `recap` target.
#[macro_export]
macro_rules! recap_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the `recap` target.
#[macro_export]
macro_rules! recap_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Trace in debug builds so frame-level logs show up when a test fails.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Trace
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
