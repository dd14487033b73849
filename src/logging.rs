//! Logging initialization for binaries.

use flexi_logger::{opt_format, Logger};

/// Starts flexi_logger with `RUST_LOG` or the given fallback level.
/// Call once, from `main`.
pub fn setup_logging(default_level: &str) {
    Logger::try_with_env_or_str(default_level)
        .unwrap()
        .format(opt_format)
        .start()
        .unwrap();
}
