//! # Primitives
//!
//! Fixed numeric tolerances and hard limits shared by the core.

/// Maximum deviation of a condition block's sum from 1 for the block to
/// count as a distribution.
///
/// Used by `is_distribution` checks and by the network's `fully_defined`.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-9;

/// Deviation a freshly normalized block must stay within.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-12;

/// Maximum number of values `ValueRange::add_range` enumerates for an
/// integral range.
///
/// Larger ranges are rejected instead of exhausting memory.
pub const MAX_ENUMERATED_RANGE: u64 = 1_000_000;

/// Maximum number of joint assignments exact enumeration visits.
///
/// Networks whose ancestral set exceeds this are refused by the
/// enumeration engine.
pub const MAX_ENUMERATED_ASSIGNMENTS: u64 = 10_000_000;

/// Maximum number of simple paths `get_all_paths` collects.
pub const MAX_ENUMERATED_PATHS: usize = 100_000;
