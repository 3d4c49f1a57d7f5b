//! Layout digests for elastic hash tables
//!
//! Provides:
//! - One root per subarray over its occupied `(slot, key)` pairs
//! - A table root over the subarray roots, in subarray order
//! - O(1) layout comparison between tables

use blake3::Hasher;

/// 32-byte BLAKE3 hash
pub type DigestRoot = [u8; 32];

/// Fingerprint of a table's slot layout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutDigest {
    /// Root per subarray
    subarray_roots: Vec<DigestRoot>,

    /// Root over all subarray roots
    root: DigestRoot,

    /// Number of occupied slots hashed
    entries: usize,
}

impl LayoutDigest {
    /// Hash one occupied slot
    pub fn hash_entry(slot: usize, key: u64) -> DigestRoot {
        let mut hasher = Hasher::new();
        hasher.update(&(slot as u64).to_le_bytes());
        hasher.update(&key.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    /// Build a digest from the occupied slots of each subarray
    ///
    /// Entry hashes inside a subarray are XOR-folded, so the order entries
    /// are visited in does not matter. Subarray roots are chained in order.
    pub fn from_subarrays<S, E>(subarrays: S) -> Self
    where
        S: IntoIterator<Item = E>,
        E: IntoIterator<Item = (usize, u64)>,
    {
        let mut entries = 0;
        let subarray_roots: Vec<DigestRoot> = subarrays
            .into_iter()
            .map(|occupied| {
                let mut root = [0u8; 32];
                for (slot, key) in occupied {
                    for (byte, h) in root.iter_mut().zip(Self::hash_entry(slot, key)) {
                        *byte ^= h;
                    }
                    entries += 1;
                }
                root
            })
            .collect();

        let mut hasher = Hasher::new();
        for root in &subarray_roots {
            hasher.update(root);
        }

        LayoutDigest {
            subarray_roots,
            root: *hasher.finalize().as_bytes(),
            entries,
        }
    }

    /// Get table root
    pub fn root(&self) -> &DigestRoot {
        &self.root
    }

    pub fn subarray_roots(&self) -> &[DigestRoot] {
        &self.subarray_roots
    }

    /// Get entry count
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Check if two layouts are identical (O(1))
    pub fn is_identical(&self, other: &Self) -> bool {
        self.root == other.root && self.entries == other.entries
    }

    /// Indices of subarrays whose roots differ between the two digests
    pub fn changed_subarrays(&self, other: &Self) -> Vec<usize> {
        let longest = self.subarray_roots.len().max(other.subarray_roots.len());
        (0..longest)
            .filter(|&i| self.subarray_roots.get(i) != other.subarray_roots.get(i))
            .collect()
    }
}
