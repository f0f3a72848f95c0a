//! Ordered key-value storage for the foundation module.
//!
//! The module keeps all of its state in a byte-keyed store with sorted
//! prefix iteration. Everything above this crate depends only on the
//! [`KvStore`] trait; [`MemStore`] is the in-process backend and
//! [`CacheStore`] layers a discardable write set over any other store.

pub mod cache;
pub mod codec;
pub mod error;
pub mod memory;

pub use cache::CacheStore;
pub use codec::{decode, encode};
pub use error::StoreError;
pub use memory::MemStore;

/// A key/value pair returned by range scans.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Byte-keyed store with ordered iteration.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>);

    fn delete(&mut self, key: &[u8]);

    /// All pairs with `start <= key < end` (unbounded above when `end` is
    /// `None`), in ascending key order.
    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair>;

    /// All pairs whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Vec<KvPair> {
        let end = prefix_end(prefix);
        self.range(prefix, end.as_deref())
    }
}

/// The smallest key greater than every key starting with `prefix`, or
/// `None` when the prefix is all `0xff` (no upper bound).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_end() {
        assert_eq!(prefix_end(&[0x01, 0x02]), Some(vec![0x01, 0x03]));
        assert_eq!(prefix_end(&[0x01, 0xff]), Some(vec![0x02]));
        assert_eq!(prefix_end(&[0xff, 0xff]), None);
        assert_eq!(prefix_end(&[]), None);
    }
}
