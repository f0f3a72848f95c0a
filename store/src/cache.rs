//! Nested write set with explicit commit.
//!
//! A [`CacheStore`] reads through to its parent and buffers every write.
//! [`CacheStore::commit`] applies the buffered writes to the parent in one
//! step; dropping the cache without committing discards them.
//!
//! ```ignore
//! let mut cache = CacheStore::new(&mut store);
//! cache.set(b"key", value);
//! if ok {
//!     cache.commit();
//! }
//! ```

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::{KvPair, KvStore};

/// A buffered branch of another store.
pub struct CacheStore<'a> {
    parent: &'a mut dyn KvStore,
    /// `None` marks a deletion.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a mut dyn KvStore) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered writes (including deletions).
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Apply all buffered writes to the parent store.
    pub fn commit(self) {
        for (key, value) in self.writes {
            match value {
                Some(v) => self.parent.set(&key, v),
                None => self.parent.delete(&key),
            }
        }
    }
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(buffered) => buffered.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.writes.insert(key.to_vec(), Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.range(start, end).into_iter().collect();
        let upper = match end {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        for (key, value) in self
            .writes
            .range::<[u8], _>((Bound::Included(start), upper))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged.into_iter().collect()
    }
}
