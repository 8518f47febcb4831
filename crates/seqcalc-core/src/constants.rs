//! Constants for engine thresholds and default service limits.

use std::time::Duration;

/// Offsets below this are computed by direct linear unrolling.
///
/// The doubling/matrix paths pay a per-call setup cost that only
/// amortizes once the offset is large enough; below this bound the
/// plain recurrence is faster and allocates less.
pub const LINEAR_UNROLL_THRESHOLD: u64 = 128;

/// Default bounded-cache capacity (entries).
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Default largest index a request may ask for.
pub const DEFAULT_MAX_INDEX: i64 = 1_000_000;

/// Default largest contiguous range a single request may span.
pub const DEFAULT_MAX_RANGE: usize = 10_000;

/// Default per-request computation deadline.
pub const DEFAULT_COMPUTATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Process exit codes used by the CLI binary.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic computation error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Computation timed out.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Request exceeded a configured limit.
    pub const ERROR_LIMIT: i32 = 3;
    /// Invalid definition or configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Computation cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
