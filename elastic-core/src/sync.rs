//! Reader/writer handle for sharing a table across threads
//!
//! Insertion takes the write lock; search and every read-only query take
//! the read lock, so any number of searches run together while an insertion
//! runs alone.

use crate::error::{BuildError, InsertError};
use crate::hashtable::ElasticHashTable;
use crate::params::ElasticParams;
use crate::placement::Placement;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Cloneable, lock-protected elastic hash table
#[derive(Clone, Debug)]
pub struct SharedElasticTable {
    inner: Arc<RwLock<ElasticHashTable>>,
}

impl SharedElasticTable {
    pub fn new(table: ElasticHashTable) -> Self {
        SharedElasticTable {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    pub fn with_params(params: ElasticParams) -> Result<Self, BuildError> {
        ElasticHashTable::with_params(params).map(Self::new)
    }

    pub fn insert(&self, key: u64) -> Result<Placement, InsertError> {
        self.inner.write().insert(key)
    }

    pub fn search(&self, key: u64) -> Option<usize> {
        self.inner.read().search(key)
    }

    pub fn locate(&self, key: u64) -> Option<Placement> {
        self.inner.read().locate(key)
    }

    pub fn contains(&self, key: u64) -> bool {
        self.inner.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Hold the read lock for several queries in a row
    pub fn read(&self) -> RwLockReadGuard<'_, ElasticHashTable> {
        self.inner.read()
    }

    /// Take the table back if this is the last handle
    pub fn into_inner(self) -> Result<ElasticHashTable, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| SharedElasticTable { inner })
    }
}
