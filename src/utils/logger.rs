//! Logging utilities
//!
//! This module sets up the `env_logger` backend behind the `log` facade.
//! Library code only uses the `log` macros; binaries and tests pick the
//! backend through [`Logger`].
//!
//! # Example
//!
//! ```rust
//! use attested_query::utils::Logger;
//!
//! // Safe to call more than once
//! Logger::try_init();
//! log::info!("logger ready");
//! ```

use log::LevelFilter;

/// Logging utilities
pub struct Logger;

impl Logger {
    /// Initialize the logger with a default level
    ///
    /// `RUST_LOG` still overrides the default.
    ///
    /// # Arguments
    /// * `level` - Log level used when `RUST_LOG` is unset
    pub fn init_with_level(level: LevelFilter) {
        Self::builder(level).init();
    }

    /// Initialize the logger, ignoring an already installed one
    ///
    /// Returns whether this call installed the logger.
    pub fn try_init() -> bool {
        Self::builder(LevelFilter::Info)
            .is_test(true)
            .try_init()
            .is_ok()
    }

    /// Map a `-v` count to a level: 0 → info, 1 → debug, 2+ → trace
    pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn builder(level: LevelFilter) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level).parse_default_env();
        builder
    }
}
