//! An ordered key-value map backed by a probabilistic skip list.
//!
//! [`SkipList`] is the single-threaded engine. [`ConcurrentSkipList`]
//! wraps it behind a reader-writer lock so that lookups run in parallel
//! while insertions and removals are exclusive.

/// Skip list parameters and environment-driven settings.
pub mod config;
/// The skip list engine, its node arena and the concurrent wrapper.
pub mod database;
/// Structured logging (formatting, filters).
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Configuration.
pub use self::config::{Settings, SkipListConfig, DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY};
/// Thread-safe wrapper and contention metrics.
#[cfg(feature = "concurrent")]
pub use database::{ConcurrentSkipList, ContentionSnapshot};
/// Engine, invariant checking and shape statistics.
pub use database::{SkipList, SkipListStatistics, ValidationError};
/// Logging bootstrap.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Error types and status codes.
pub use skipmap_error::{ConfigError, ErrorExt, SkipListError, SkipListResult, StatusCode};
