//! Elastic hash table implementation
//!
//! Provides:
//! - O(1) amortized, O(log δ⁻¹) worst-case expected probes
//! - Geometric subarrays with a batch-wave cursor
//! - Three-case insertion that never moves a placed key
//! - Search mirroring insertion's probe budgets
//!
//! Insertion takes `&mut self` and search takes `&self`, so the
//! single-writer / many-reader discipline is checked by the borrow checker.
//! [`SharedElasticTable`](crate::sync::SharedElasticTable) adds the lock for
//! callers that share a table across threads.

use crate::cursor::BatchCursor;
use crate::digest::LayoutDigest;
use crate::error::{BuildError, InsertError};
use crate::params::ElasticParams;
use crate::partition::{Partition, Subarray};
use crate::placement::Placement;
use crate::probe::MAX_PROBE;
use log::{debug, error};

/// Overflow probing tries at most `size * OVERFLOW_PROBE_FACTOR` slots of a
/// subarray.
pub const OVERFLOW_PROBE_FACTOR: usize = 4;

/// Free fraction of the next subarray at or below which overflow probing
/// takes over
const OVERFLOW_THRESHOLD: f64 = 0.25;

/// Probe budget f(ε) = ⌊4·min(log2(1/ε)², log2(1/δ))⌋, never below β
///
/// An empty subarray (ε = 1) would otherwise get no probes at all. A full
/// one (ε = 0) gets the δ-bound since log2(1/0) is infinite.
#[inline]
pub fn probe_budget(epsilon: f64, log_inv_delta: f64, beta: usize) -> usize {
    let log_eps = (1.0 / epsilon).log2();
    let f = (4.0 * (log_eps * log_eps).min(log_inv_delta)).floor() as usize;
    f.max(beta)
}

/// Open-addressing table of `u64` keys using elastic hashing
#[derive(Clone, Debug)]
pub struct ElasticHashTable {
    /// Slot table, `None` marks an empty slot
    pub(crate) slots: Vec<Option<u64>>,

    /// Subarray layout and fill counters
    pub(crate) partition: Partition,

    /// Current insertion wave
    pub(crate) cursor: BatchCursor,

    pub(crate) params: ElasticParams,

    /// Current number of keys
    pub(crate) items: usize,

    /// Load ceiling ⌊n·(1−δ)⌋
    pub(crate) max_items: usize,
}

impl ElasticHashTable {
    /// Create a new elastic hash table
    ///
    /// # Arguments
    /// * `capacity` - Number of slots (n)
    /// * `delta` - Empty fraction (0 < δ < 1), controls β and the subarray count
    pub fn new(capacity: usize, delta: f64) -> Result<Self, BuildError> {
        Self::with_params(ElasticParams::new(capacity, delta))
    }

    pub fn with_params(params: ElasticParams) -> Result<Self, BuildError> {
        let partition = Partition::build(&params)?;

        let mut slots = Vec::new();
        slots.try_reserve_exact(params.capacity)?;
        slots.resize(params.capacity, None);

        let cursor = BatchCursor::new(partition[0].size());

        Ok(ElasticHashTable {
            slots,
            partition,
            cursor,
            params,
            items: 0,
            max_items: params.max_items(),
        })
    }

    /// Insert a key
    ///
    /// Returns where the key was placed. A key that is already present is
    /// left where it is and its existing placement is returned.
    pub fn insert(&mut self, key: u64) -> Result<Placement, InsertError> {
        if let Some(existing) = self.locate(key) {
            return Ok(existing);
        }

        if self.items >= self.max_items {
            debug!(
                "rejecting key {}: {} items at ceiling {}",
                key, self.items, self.max_items
            );
            return Err(InsertError::CapacityExceeded {
                items: self.items,
                max_items: self.max_items,
            });
        }

        let placed = self.place(key);
        self.cursor.record_attempt(&self.partition);

        placed.ok_or_else(|| {
            error!(
                "no subarray accepted key {} (items={}, epsilons={:?})",
                key,
                self.items,
                self.partition.iter().map(Subarray::epsilon).collect::<Vec<_>>()
            );
            InsertError::ProbeExhausted { key }
        })
    }

    /// Scan the subarrays, starting from the active wave and wrapping around
    /// to the ones it already passed. When every case declines the key, fall
    /// back to overflow probing wherever a slot is still free.
    fn place(&mut self, key: u64) -> Option<Placement> {
        let num_arrays = self.partition.len();
        let first = self.cursor.active().min(num_arrays - 1);

        for i in (first..num_arrays).chain(0..first) {
            if let Some(placement) = self.try_subarray(key, i) {
                return Some(placement);
            }
        }

        self.place_anywhere(key)
    }

    /// Apply the insertion case that matches subarray `i`
    fn try_subarray(&mut self, key: u64, i: usize) -> Option<Placement> {
        // The last subarray has no successor to classify it by.
        let next_epsilon = self.partition.get(i + 1)?.epsilon();
        let epsilon = self.partition[i].epsilon();
        let half_delta = self.params.delta / 2.0;

        if epsilon > half_delta && next_epsilon > OVERFLOW_THRESHOLD {
            // Case A: bounded probing
            let budget = self.budget(epsilon);
            self.probe_into(key, i, budget)
        } else if epsilon <= half_delta {
            // Case B: retired for this pass
            None
        } else {
            // Case C: the next subarray is nearly full
            let limit = self.overflow_limit(i);
            let placed = self.probe_into(key, i, limit);
            if placed.is_none() {
                error!(
                    "overflow probing gave up after {} probes in subarray {} (epsilon={:.4})",
                    limit, i, epsilon
                );
            }
            placed
        }
    }

    /// Overflow probing over every subarray with a free slot, retired ones and
    /// the last one included
    fn place_anywhere(&mut self, key: u64) -> Option<Placement> {
        for i in 0..self.partition.len() {
            let subarray = &self.partition[i];
            if subarray.filled_slots() >= subarray.size() {
                continue;
            }

            let limit = self.overflow_limit(i);
            if let Some(placement) = self.probe_into(key, i, limit) {
                debug!("key {} placed by fallback: {}", key, placement);
                return Some(placement);
            }
        }

        None
    }

    #[inline]
    fn overflow_limit(&self, i: usize) -> usize {
        self.partition[i]
            .size()
            .saturating_mul(OVERFLOW_PROBE_FACTOR)
            .min(MAX_PROBE)
    }

    /// Place `key` in the first empty slot among the first `limit` probes
    fn probe_into(&mut self, key: u64, i: usize, limit: usize) -> Option<Placement> {
        let (probe, slot) = self.partition[i]
            .probes(i, key, limit)
            .find(|&(_, slot)| self.slots[slot].is_none())?;

        self.slots[slot] = Some(key);
        self.partition[i].record_placement(probe);
        self.items += 1;

        Some(Placement::new(slot, i, probe))
    }

    #[inline]
    fn budget(&self, epsilon: f64) -> usize {
        probe_budget(epsilon, self.params.log_inv_delta(), self.partition.beta())
    }

    /// Find where `key` is stored
    ///
    /// Each subarray is probed up to its live budget, extended to the
    /// deepest probe that ever placed a key there. An empty slot ends the
    /// subarray early: a key placed later in the sequence would have taken it.
    pub fn locate(&self, key: u64) -> Option<Placement> {
        self.partition
            .iter()
            .enumerate()
            .find_map(|(i, subarray)| {
                let limit = self
                    .budget(subarray.epsilon())
                    .max(subarray.deepest_probe());

                for (probe, slot) in subarray.probes(i, key, limit) {
                    match self.slots[slot] {
                        Some(stored) if stored == key => {
                            return Some(Placement::new(slot, i, probe));
                        }
                        Some(_) => {}
                        None => break,
                    }
                }

                None
            })
    }

    /// Slot holding `key`, if present
    pub fn search(&self, key: u64) -> Option<usize> {
        self.locate(key).map(|placement| placement.slot)
    }

    pub fn contains(&self, key: u64) -> bool {
        self.locate(key).is_some()
    }

    /// Key stored in `slot`
    pub fn get_slot(&self, slot: usize) -> Option<u64> {
        self.slots.get(slot).copied().flatten()
    }

    /// Release the table
    pub fn destroy(self) {
        debug!(
            "destroying table: n={} items={}",
            self.params.capacity, self.items
        );
    }

    /// Get current size
    pub fn len(&self) -> usize {
        self.items
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Get capacity
    pub fn capacity(&self) -> usize {
        self.params.capacity
    }

    /// Largest number of keys the table accepts
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Get load factor
    pub fn load_factor(&self) -> f64 {
        self.items as f64 / self.params.capacity as f64
    }

    pub fn params(&self) -> &ElasticParams {
        &self.params
    }

    /// Get delta parameter
    pub fn delta(&self) -> f64 {
        self.params.delta
    }

    /// Get beta parameter
    pub fn beta(&self) -> usize {
        self.partition.beta()
    }

    /// Number of subarrays built
    pub fn num_arrays(&self) -> usize {
        self.partition.len()
    }

    /// Number of subarrays δ asked for
    pub fn nominal_arrays(&self) -> usize {
        self.partition.nominal()
    }

    pub fn subarrays(&self) -> &[Subarray] {
        self.partition.as_slice()
    }

    /// Current free fraction of subarray `i`
    pub fn epsilon(&self, i: usize) -> Option<f64> {
        self.partition.get(i).map(Subarray::epsilon)
    }

    /// Case A probe budget subarray `i` has right now
    pub fn probe_budget(&self, i: usize) -> Option<usize> {
        self.partition.get(i).map(|s| self.budget(s.epsilon()))
    }

    /// Fill ratio per subarray
    pub fn density_by_subarray(&self) -> Vec<f64> {
        self.partition
            .iter()
            .map(|s| s.filled_slots() as f64 / s.size() as f64)
            .collect()
    }

    pub fn cursor(&self) -> &BatchCursor {
        &self.cursor
    }

    /// Iterate over `(slot, key)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, key)| key.map(|key| (slot, key)))
    }

    /// Fingerprint of the current slot layout
    pub fn layout_digest(&self) -> LayoutDigest {
        let slots = &self.slots;
        LayoutDigest::from_subarrays(self.partition.iter().map(move |subarray| {
            subarray
                .slots()
                .filter_map(move |slot| slots[slot].map(|key| (slot, key)))
        }))
    }
}
