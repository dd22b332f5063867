//! Logging utilities and structured logging support

use std::sync::Once;

pub use env_logger::WriteStyle;
pub use log::{debug, info, warn, error, trace};

/// Logger configuration
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "model_engine=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Explicit filter; falls back to `RUST_LOG`, then `info`
    pub env_filter: Option<String>,
    /// ANSI coloring behavior
    pub write_style: WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Create a config with an explicit filter
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Default::default()
        }
    }
}

static INIT: Once = Once::new();

/// Initialize the logging system
///
/// Idempotent; only the first call installs the logger.
pub fn init(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        // Another logger may already be installed (e.g. by a test harness)
        match builder.try_init() {
            Ok(()) => log::debug!("logging initialized"),
            Err(e) => log::debug!("keeping the installed logger: {}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_keeps_first_logger() {
        init(LoggingConfig::with_filter("model_engine=trace"));
        init(LoggingConfig::with_filter("off"));

        assert!(INIT.is_completed());
        assert!(log::max_level() >= log::LevelFilter::Trace);
    }
}
