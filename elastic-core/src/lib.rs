//! Elastic Hash Table - open addressing without reordering
//!
//! Core library providing:
//! - Geometric subarrays sized from the empty fraction δ
//! - Injective probe sequences φ(i, j)
//! - Three-case insertion driven by a batch-wave cursor
//! - Search mirroring insertion's probe budgets
//! - Layout digests and a reader/writer shared handle
//!
//! ```
//! use elastic_core::ElasticHashTable;
//!
//! let mut table = ElasticHashTable::new(1024, 0.1).unwrap();
//! let placement = table.insert(42).unwrap();
//! assert_eq!(table.search(42), Some(placement.slot));
//! ```

pub mod cursor;
pub mod digest;
pub mod error;
pub mod hashtable;
pub mod params;
pub mod partition;
pub mod placement;
pub mod probe;
pub mod sync;

pub use cursor::BatchCursor;
pub use digest::LayoutDigest;
pub use error::{BuildError, InsertError};
pub use hashtable::ElasticHashTable;
pub use params::ElasticParams;
pub use partition::Subarray;
pub use placement::Placement;
pub use sync::SharedElasticTable;


#[cfg(test)]
mod proptests;
