//! Probe sequence generation
//!
//! φ(i, j) packs the probe number `j` and the subarray index `i` into one
//! word, from the most significant bit down:
//!
//! ```text
//! 1 (j₀ 1)(j₁ 1) … (j_k 1) 0 i₇ … i₀
//! ```
//!
//! Every bit of `j` is followed by a 1 marker and the `j` block is closed by a
//! single 0, so distinct `(i, j)` pairs never share a pattern. The slot for
//! probe `j` is `start + (mix64(φ(i, j) ^ key) mod size)`.
//!
//! The low nine bits of φ never depend on `j`, so reducing `φ ^ key` directly
//! would confine a key to a fraction of any subarray whose size has a
//! power-of-two factor. [`mix64`] is a bijection on 64-bit words that spreads
//! every input bit over the low bits, which keeps distinct probes distinct
//! before the reduction.

/// Width of the subarray index field in φ
pub const INDEX_BITS: u32 = 8;

/// Number of subarrays the index field can address
pub const MAX_SUBARRAYS: usize = 1 << INDEX_BITS;

/// Probe numbers below this bound keep φ inside 64 bits
pub const MAX_PROBE: usize = 1 << 27;

/// φ(i, j)
#[inline]
pub fn phi(i: usize, j: usize) -> u64 {
    debug_assert!(i < MAX_SUBARRAYS, "subarray index {i} overflows the index field");

    let mut result: u64 = 1;
    let mut j = j as u64;
    while j > 0 {
        result = (result << 2) | ((j & 1) << 1) | 1;
        j >>= 1;
    }

    (result << (INDEX_BITS + 1)) | i as u64
}

/// SplitMix64 finalizer
#[inline(always)]
pub fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Offset of probe `j` for `key` within a subarray of `size` slots
#[inline(always)]
pub fn probe_offset(key: u64, i: usize, j: usize, size: usize) -> usize {
    (mix64(phi(i, j) ^ key) % size as u64) as usize
}

/// Absolute slots probed for one key inside one subarray
///
/// Yields `(probe, slot)` pairs for `probe = 0 .. limit`. The sequence owns
/// copies of the subarray geometry, so it does not borrow the table.
#[derive(Clone, Debug)]
pub struct ProbeSequence {
    key: u64,
    index: usize,
    start: usize,
    size: usize,
    next: usize,
    limit: usize,
}

impl ProbeSequence {
    /// # Arguments
    /// * `key` - Key being placed or looked up
    /// * `index` - Subarray index `i`
    /// * `start` - First slot of the subarray
    /// * `size` - Slot count of the subarray (positive)
    /// * `limit` - Number of probes, capped at [`MAX_PROBE`]
    pub fn new(key: u64, index: usize, start: usize, size: usize, limit: usize) -> Self {
        debug_assert!(size > 0);
        ProbeSequence {
            key,
            index,
            start,
            size,
            next: 0,
            limit: limit.min(MAX_PROBE),
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.limit {
            return None;
        }
        let probe = self.next;
        self.next += 1;
        Some((
            probe,
            self.start + probe_offset(self.key, self.index, probe, self.size),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.limit - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_phi_layout() {
        assert_eq!(phi(0, 0), 1 << 9);
        assert_eq!(phi(3, 0), (1 << 9) | 3);
        // j = 1: 1 (1 1) 0 iiiiiiii
        assert_eq!(phi(0, 1), 0b111 << 9);
        // j = 2: 1 (0 1)(1 1) 0 iiiiiiii
        assert_eq!(phi(5, 2), (0b1_01_11 << 9) | 5);
    }

    #[test]
    fn test_phi_injective_in_j() {
        for i in 0..16 {
            let mut seen = HashSet::new();
            for j in 0..4096 {
                assert!(seen.insert(phi(i, j)), "phi({i}, {j}) repeats");
            }
        }
    }

    #[test]
    fn test_phi_injective_over_pairs() {
        let mut seen = HashSet::new();
        for i in 0..MAX_SUBARRAYS {
            for j in 0..64 {
                assert!(seen.insert(phi(i, j)));
            }
        }
    }

    #[test]
    fn test_phi_fits_at_probe_bound() {
        let top = phi(MAX_SUBARRAYS - 1, MAX_PROBE - 1);
        assert_eq!(top.leading_zeros(), 0);
    }

    #[test]
    fn test_sequence_stays_in_subarray() {
        let seq = ProbeSequence::new(0xDEAD_BEEF, 2, 100, 49, 200);
        assert_eq!(seq.len(), 200);
        for (probe, slot) in seq {
            assert!((100..149).contains(&slot), "probe {probe} left the subarray");
        }
    }

    #[test]
    fn test_sequence_is_deterministic() {
        let a: Vec<_> = ProbeSequence::new(42, 0, 0, 763, 13).collect();
        let b: Vec<_> = ProbeSequence::new(42, 0, 0, 763, 13).collect();
        assert_eq!(a, b);
        assert_eq!(a.first().map(|&(j, _)| j), Some(0));
    }

    #[test]
    fn test_mix64_keeps_distinct_inputs_distinct() {
        assert_eq!(mix64(0), 0);
        let outputs: HashSet<u64> = (0..4096u64).map(|x| mix64(x << 9)).collect();
        assert_eq!(outputs.len(), 4096);
        // Inputs that agree on their low bits still land on different low bits.
        let low: HashSet<u64> = (0..4096u64).map(|x| mix64(x << 9) & 0x1ff).collect();
        assert!(low.len() > 256);
    }

    #[test]
    fn test_offsets_reach_even_sized_subarrays() {
        for size in [12, 196, 512] {
            let reached: HashSet<usize> =
                (0..size * 8).map(|j| probe_offset(42, 1, j, size)).collect();
            assert_eq!(reached.len(), size, "size {size} only reached {}", reached.len());
        }
    }

    #[test]
    fn test_sequence_covers_small_subarray() {
        // Enough probes reach every slot of a 7-slot subarray.
        let slots: HashSet<usize> = ProbeSequence::new(9, 3, 0, 7, 256)
            .map(|(_, slot)| slot)
            .collect();
        assert_eq!(slots.len(), 7);
    }
}
