//! Geometric subarray partition
//!
//! The slot table is cut into contiguous subarrays whose sizes shrink by
//! roughly 3/4 each step. Every size is a positive multiple of β; the layout
//! is fixed at construction while the fill counters evolve with insertion.

use crate::error::BuildError;
use crate::params::ElasticParams;
use crate::probe::ProbeSequence;
use log::trace;
use std::ops::{Index, IndexMut, Range};

/// One subarray of the slot table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subarray {
    /// First slot
    pub(crate) start: usize,

    /// Slot count, a positive multiple of β
    pub(crate) size: usize,

    /// Occupied slots, never decreases
    pub(crate) filled_slots: usize,

    /// One past the largest probe number that placed a key here
    pub(crate) deepest_probe: usize,
}

impl Subarray {
    fn new(start: usize, size: usize) -> Self {
        Subarray {
            start,
            size,
            filled_slots: 0,
            deepest_probe: 0,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn filled_slots(&self) -> usize {
        self.filled_slots
    }

    pub fn deepest_probe(&self) -> usize {
        self.deepest_probe
    }

    /// Absolute slot range covered by this subarray
    pub fn slots(&self) -> Range<usize> {
        self.start..self.start + self.size
    }

    /// Free fraction ε = 1 − filled/size, computed from the live counters
    #[inline]
    pub fn epsilon(&self) -> f64 {
        1.0 - self.filled_slots as f64 / self.size as f64
    }

    /// First `limit` probes for `key`, given this subarray's index
    #[inline]
    pub fn probes(&self, index: usize, key: u64, limit: usize) -> ProbeSequence {
        ProbeSequence::new(key, index, self.start, self.size, limit)
    }

    pub(crate) fn record_placement(&mut self, probe: usize) {
        debug_assert!(self.filled_slots < self.size);
        self.filled_slots += 1;
        self.deepest_probe = self.deepest_probe.max(probe + 1);
    }
}

/// round(¾·n) without the overflow of `3 * n`
#[inline]
fn three_quarters_rounded(n: usize) -> usize {
    const ROUNDED_REMAINDER: [usize; 4] = [0, 1, 2, 2];
    3 * (n / 4) + ROUNDED_REMAINDER[n % 4]
}

/// Ordered subarrays covering a prefix of the slot table
#[derive(Clone, Debug)]
pub struct Partition {
    subarrays: Vec<Subarray>,
    beta: usize,
    nominal: usize,
}

impl Partition {
    /// Lay out the subarrays for `params`
    ///
    /// Sizes follow `max(β, round(¾·remaining))` rounded down to a multiple
    /// of β. Building stops after α subarrays or once fewer than β slots
    /// remain, so the partition may be shorter than α.
    pub fn build(params: &ElasticParams) -> Result<Self, BuildError> {
        params.validate()?;

        let beta = params.beta();
        let nominal = params.nominal_arrays();

        let mut subarrays = Vec::new();
        subarrays.try_reserve_exact(nominal)?;

        let mut remaining = params.capacity;
        let mut start = 0;
        while subarrays.len() < nominal && remaining >= beta {
            let size = three_quarters_rounded(remaining).max(beta);
            let size = size - size % beta;

            subarrays.push(Subarray::new(start, size));
            start += size;
            remaining -= size;
        }

        if subarrays.len() < 2 {
            return Err(BuildError::TooFewSubarrays {
                capacity: params.capacity,
                beta,
                built: subarrays.len(),
            });
        }

        let max_items = params.max_items();
        if start < max_items {
            return Err(BuildError::CeilingUnreachable {
                covered: start,
                max_items,
            });
        }

        trace!(
            "partition: n={} beta={} subarrays={}/{} covered={} sizes={:?}",
            params.capacity,
            beta,
            subarrays.len(),
            nominal,
            start,
            subarrays.iter().map(|s| s.size).collect::<Vec<_>>()
        );

        Ok(Partition {
            subarrays,
            beta,
            nominal,
        })
    }

    /// Number of subarrays actually built
    pub fn len(&self) -> usize {
        self.subarrays.len()
    }

    /// Always false, a built partition holds at least two subarrays
    pub fn is_empty(&self) -> bool {
        self.subarrays.is_empty()
    }

    pub fn beta(&self) -> usize {
        self.beta
    }

    /// Subarray count requested by δ (α)
    pub fn nominal(&self) -> usize {
        self.nominal
    }

    /// Slots covered by the partition
    pub fn covered_slots(&self) -> usize {
        self.subarrays.iter().map(|s| s.size).sum()
    }

    pub fn get(&self, index: usize) -> Option<&Subarray> {
        self.subarrays.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subarray> {
        self.subarrays.iter()
    }

    pub fn as_slice(&self) -> &[Subarray] {
        &self.subarrays
    }
}

impl Index<usize> for Partition {
    type Output = Subarray;

    fn index(&self, index: usize) -> &Subarray {
        &self.subarrays[index]
    }
}

impl IndexMut<usize> for Partition {
    fn index_mut(&mut self, index: usize) -> &mut Subarray {
        &mut self.subarrays[index]
    }
}
