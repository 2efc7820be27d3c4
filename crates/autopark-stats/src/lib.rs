//! Statistics used to summarize training runs.
//!
//! - [`descriptive`]: min, max, mean, median, variance and standard deviation
//!   of a dataset, used for the per-generation reward distribution
//!
//! ```
//! use autopark_stats::descriptive::DescriptiveStats;
//!
//! let rewards = [-120.0, 40.0, 15.0, 999_000.0];
//! let stats = DescriptiveStats::new(rewards).unwrap();
//! assert_eq!(stats.count, 4);
//! assert_eq!(stats.max, 999_000.0);
//! assert_eq!(stats.median, 40.0);
//! ```

pub mod descriptive;
