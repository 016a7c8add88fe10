//! Utilities module
//!
//! - `helpers`: random workloads and report formatting
//! - `logger`: `env_logger` initialisation
//!
//! # Example
//!
//! ```rust
//! use attested_query::utils::{Helpers, Logger};
//! use std::time::Duration;
//!
//! Logger::try_init();
//! let formatted = Helpers::format_duration(Duration::from_millis(1234));
//! assert_eq!(formatted, "1.23s");
//! ```

pub mod helpers;
pub mod logger;

// Re-export main types for convenience
pub use helpers::Helpers;
pub use logger::Logger;
