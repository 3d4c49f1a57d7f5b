//! Construction parameters
//!
//! A table is fully described by its slot count `n` and the empty fraction
//! `δ`. The probe granularity β, the nominal subarray count α and the load
//! ceiling are all derived from these two numbers.

use crate::error::BuildError;
use crate::probe::MAX_SUBARRAYS;

/// Parameters of an elastic hash table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElasticParams {
    /// Total number of slots (n)
    pub capacity: usize,

    /// Fraction of slots that stays empty at the load ceiling (δ)
    pub delta: f64,
}

impl ElasticParams {
    pub fn new(capacity: usize, delta: f64) -> Self {
        ElasticParams { capacity, delta }
    }

    /// Check that the parameters describe a buildable table
    ///
    /// Whether the capacity is large enough for at least two subarrays is
    /// only known once the partition is laid out, see
    /// [`Partition::build`](crate::partition::Partition::build).
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        // Written so that NaN is rejected too.
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(BuildError::InvalidDelta(self.delta));
        }
        let nominal = self.nominal_arrays();
        if nominal > MAX_SUBARRAYS {
            return Err(BuildError::TooManySubarrays(nominal));
        }
        Ok(())
    }

    /// log2(1/δ)
    #[inline]
    pub fn log_inv_delta(&self) -> f64 {
        (1.0 / self.delta).log2()
    }

    /// β = round(2·log2(1/δ)), at least 1
    pub fn beta(&self) -> usize {
        ((2.0 * self.log_inv_delta()).round() as usize).max(1)
    }

    /// α = ⌈4·log2(1/δ) + 10⌉, an upper bound on the subarray count
    pub fn nominal_arrays(&self) -> usize {
        (4.0 * self.log_inv_delta() + 10.0).ceil() as usize
    }

    /// Load ceiling ⌊n·(1−δ)⌋
    pub fn max_items(&self) -> usize {
        (self.capacity as f64 * (1.0 - self.delta)).floor() as usize
    }
}

impl Default for ElasticParams {
    fn default() -> Self {
        Self::new(1024, 0.1)
    }
}
