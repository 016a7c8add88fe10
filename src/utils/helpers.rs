//! Helper functions
//!
//! Random workloads for the demo driver and benchmarks, and formatting for
//! their reports.
//!
//! # Example
//!
//! ```rust
//! use attested_query::config::ProtocolConfig;
//! use attested_query::utils::Helpers;
//!
//! let config = ProtocolConfig {
//!     n_row: 8,
//!     n_col: 3,
//!     answer_size: 2,
//!     ..ProtocolConfig::default()
//! };
//! let mut rng = rand::rng();
//! let dataset = Helpers::random_dataset(&config, &mut rng).unwrap();
//! let rows = Helpers::sample_rows(config.n_row, config.answer_size, &mut rng);
//!
//! assert_eq!(dataset.num_rows(), 8);
//! assert_eq!(rows.len(), 2);
//! ```

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::types::Dataset;
use halo2curves::bn256::Fr as Field;
use rand::Rng;
use std::time::Duration;

/// Helper functions
pub struct Helpers;

impl Helpers {
    /// Format bytes to human-readable string
    ///
    /// # Example
    /// ```
    /// use attested_query::utils::Helpers;
    ///
    /// assert_eq!(Helpers::format_bytes(1024), "1.00 KB");
    /// ```
    pub fn format_bytes(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }

    /// Format a duration as seconds, milliseconds or microseconds
    pub fn format_duration(duration: Duration) -> String {
        if duration.as_secs() >= 1 {
            format!("{:.2}s", duration.as_secs_f64())
        } else if duration.as_millis() >= 1 {
            format!("{}ms", duration.as_millis())
        } else {
            format!("{}µs", duration.as_micros())
        }
    }

    /// Random `n_row × n_col` dataset
    ///
    /// Draws a pool of `n_row` values in `[1, max_value]` and fills every
    /// cell from the pool, so values repeat across cells the way real
    /// columns do.
    pub fn random_dataset<R: Rng + ?Sized>(config: &ProtocolConfig, rng: &mut R) -> Result<Dataset> {
        let pool: Vec<u64> = (0..config.n_row)
            .map(|_| rng.random_range(1..=config.max_value))
            .collect();

        let rows = (0..config.n_row)
            .map(|_| {
                (0..config.n_col)
                    .map(|_| Field::from(pool[rng.random_range(0..pool.len())]))
                    .collect()
            })
            .collect();
        Dataset::new(rows)
    }

    /// `amount` distinct row indices out of `n_row`, in random order
    ///
    /// Clamps `amount` to `n_row`.
    pub fn sample_rows<R: Rng + ?Sized>(n_row: usize, amount: usize, rng: &mut R) -> Vec<usize> {
        rand::seq::index::sample(rng, n_row, amount.min(n_row)).into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_format_bytes() {
        assert_eq!(Helpers::format_bytes(0), "0 B");
        assert_eq!(Helpers::format_bytes(1024), "1.00 KB");
        assert_eq!(Helpers::format_bytes(1024 * 1024), "1.00 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(Helpers::format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(Helpers::format_duration(Duration::from_millis(20)), "20ms");
        assert_eq!(Helpers::format_duration(Duration::from_micros(7)), "7µs");
    }

    #[test]
    fn test_random_dataset_bounds() {
        let config = ProtocolConfig {
            n_row: 30,
            n_col: 4,
            answer_size: 30,
            max_value: 5,
            ..ProtocolConfig::default()
        };
        let dataset = Helpers::random_dataset(&config, &mut rand::rng()).unwrap();
        assert_eq!(dataset.num_rows(), 30);
        assert_eq!(dataset.num_columns(), 4);

        let allowed: Vec<Field> = (1..=5u64).map(Field::from).collect();
        for row in dataset.rows() {
            assert!(row.iter().all(|v| allowed.contains(v)));
        }
    }

    #[test]
    fn test_sample_rows_distinct() {
        let rows = Helpers::sample_rows(50, 20, &mut rand::rng());
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().all(|&r| r < 50));
        assert_eq!(rows.iter().collect::<HashSet<_>>().len(), 20);

        assert_eq!(Helpers::sample_rows(3, 10, &mut rand::rng()).len(), 3);
    }
}
