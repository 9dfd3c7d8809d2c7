// src/log.rs
//! Logging front-end.
//!
//! The `log*!` macros are thin forwards to `tracing`, so library code keeps one
//! short spelling per level and the binary decides where the events go.

/// Install the fmt subscriber used by the CLI.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (e.g. `"info"`) applies.
/// Calling this twice is harmless: the second install is ignored.
#[cfg(feature = "cli")]
pub fn init(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}
