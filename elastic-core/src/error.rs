//! Error types for table construction and insertion
//!
//! Search has no error type: a missing key is an ordinary `None`.

use std::collections::TryReserveError;
use thiserror::Error;

/// Reasons a table cannot be built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("capacity must be positive")]
    ZeroCapacity,

    #[error("delta must lie strictly between 0 and 1, got {0}")]
    InvalidDelta(f64),

    /// Insertion classifies a subarray by the fill of its successor, so a
    /// single subarray cannot be scanned.
    #[error(
        "capacity {capacity} with beta {beta} yields {built} subarray(s), at least two are required"
    )]
    TooFewSubarrays {
        capacity: usize,
        beta: usize,
        built: usize,
    },

    /// The subarrays leave fewer than `max_items` slots addressable, so the
    /// load ceiling could never be reached.
    #[error("subarrays cover {covered} slots, below the load ceiling of {max_items}")]
    CeilingUnreachable { covered: usize, max_items: usize },

    #[error("delta asks for {0} subarrays, more than the probe index field can address")]
    TooManySubarrays(usize),

    #[error("failed to allocate table storage: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

/// Reasons an insertion did not place its key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The δ-bounded load ceiling has been reached. Recoverable only by
    /// using a fresh table.
    #[error("table holds {items} keys, the load ceiling is {max_items}")]
    CapacityExceeded { items: usize, max_items: usize },

    /// Every subarray was scanned and no insertion case placed the key.
    #[error("no subarray accepted key {key}")]
    ProbeExhausted { key: u64 },
}
