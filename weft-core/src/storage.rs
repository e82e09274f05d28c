//! The flat key-value store the runtime reads and writes.
//!
//! Every component takes its storage as a parameter instead of reaching for the host
//! functions directly. Inside a wasm call that parameter is [`HostStorage`], which forwards
//! to `sp_io`. Native unit tests can hand in a [`MemoryStorage`] instead and need no
//! externalities at all.
//!
//! Components that only read take `&S`; anything that writes takes `&mut S`. This keeps the
//! read-only contract of transaction-pool validation visible in the types.

use crate::{types::Hash, LOG_TARGET};
use parity_scale_codec::{Decode, Encode};
use sp_core::hexdisplay::HexDisplay;
use sp_std::vec::Vec;
use sp_storage::StateVersion;

/// Access to the host's key-value store for the duration of a single entry-point call.
pub trait Storage {
    /// Read the raw value at `key`.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Write `value` at `key`, replacing what was there.
    fn set(&mut self, key: &[u8], value: &[u8]);

    /// Remove `key`.
    fn clear(&mut self, key: &[u8]);

    /// Whether anything is stored at `key`.
    fn exists(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Open a nested transaction. Writes after this point can be rolled back as a unit.
    fn start_transaction(&mut self);

    /// Keep the writes of the innermost open transaction.
    fn commit_transaction(&mut self);

    /// Discard the writes of the innermost open transaction.
    fn rollback_transaction(&mut self);

    /// The merkle root of everything currently stored.
    fn root(&mut self, version: StateVersion) -> Hash;
}

/// Run `f` inside a storage transaction. Its writes are committed if it returns `Ok` and
/// rolled back otherwise.
pub fn with_transaction<S, R, E, F>(storage: &mut S, f: F) -> Result<R, E>
where
    S: Storage,
    F: FnOnce(&mut S) -> Result<R, E>,
{
    storage.start_transaction();
    let result = f(storage);
    match result {
        Ok(_) => storage.commit_transaction(),
        Err(_) => storage.rollback_transaction(),
    }
    result
}

/// Fetch and decode the value at `key`. Undecodable values are reported and treated as absent.
pub fn get<T: Decode, S: Storage>(storage: &S, key: &[u8]) -> Option<T> {
    let raw = storage.get(key)?;
    match crate::codec::decode_all(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!(
                target: LOG_TARGET,
                "Corrupted state at {}: {:?}",
                HexDisplay::from(&key),
                e
            );
            None
        }
    }
}

/// Like [`get`], falling back to the type's default.
pub fn get_or_default<T: Decode + Default, S: Storage>(storage: &S, key: &[u8]) -> T {
    get(storage, key).unwrap_or_default()
}

/// Fetch, decode and remove the value at `key`.
pub fn take<T: Decode, S: Storage>(storage: &mut S, key: &[u8]) -> Option<T> {
    let value = get(storage, key);
    storage.clear(key);
    value
}

/// Encode `value` and store it at `key`.
pub fn put<T: Encode + ?Sized, S: Storage>(storage: &mut S, key: &[u8], value: &T) {
    let encoded = value.encode();
    log::trace!(
        target: LOG_TARGET,
        "Writing {} at {}",
        HexDisplay::from(&encoded),
        HexDisplay::from(&key)
    );
    storage.set(key, &encoded);
}

/// Read-modify-write the value at `key`, starting from the default when absent.
pub fn mutate<T, S, R>(storage: &mut S, key: &[u8], update: impl FnOnce(&mut T) -> R) -> R
where
    T: Decode + Encode + Default,
    S: Storage,
{
    let mut value = get_or_default(storage, key);
    let result = update(&mut value);
    put(storage, key, &value);
    result
}

/// Storage backed by the host functions of `sp_io`.
///
/// Only meaningful inside a wasm call or inside `sp_io::TestExternalities::execute_with`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostStorage;

impl Storage for HostStorage {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        sp_io::storage::get(key).map(|value| value.to_vec())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        sp_io::storage::set(key, value)
    }

    fn clear(&mut self, key: &[u8]) {
        sp_io::storage::clear(key)
    }

    fn exists(&self, key: &[u8]) -> bool {
        sp_io::storage::exists(key)
    }

    fn start_transaction(&mut self) {
        sp_io::storage::start_transaction()
    }

    fn commit_transaction(&mut self) {
        sp_io::storage::commit_transaction()
    }

    fn rollback_transaction(&mut self) {
        sp_io::storage::rollback_transaction()
    }

    fn root(&mut self, version: StateVersion) -> Hash {
        let raw_state_root = sp_io::storage::root(version);
        Hash::from_slice(&raw_state_root[..])
    }
}

/// An in-memory store with a snapshot stack for transactions.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: std::collections::BTreeMap<Vec<u8>, Vec<u8>>,
    snapshots: Vec<std::collections::BTreeMap<Vec<u8>, Vec<u8>>>,
}

#[cfg(feature = "std")]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all stored pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Vec<u8>)> {
        self.entries.iter()
    }
}

#[cfg(feature = "std")]
impl Storage for MemoryStorage {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.entries.insert(key.to_vec(), value.to_vec());
    }

    fn clear(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }

    fn start_transaction(&mut self) {
        self.snapshots.push(self.entries.clone());
    }

    fn commit_transaction(&mut self) {
        if self.snapshots.pop().is_none() {
            log::error!(target: LOG_TARGET, "Commit with no open transaction");
        }
    }

    fn rollback_transaction(&mut self) {
        match self.snapshots.pop() {
            Some(snapshot) => self.entries = snapshot,
            None => log::error!(target: LOG_TARGET, "Rollback with no open transaction"),
        }
    }

    fn root(&mut self, version: StateVersion) -> Hash {
        let pairs = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        sp_io::trie::blake2_256_root(pairs, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_function_call_works() {
        sp_io::TestExternalities::new_empty().execute_with(|| {
            let mut storage = HostStorage;
            put(&mut storage, b"answer", &42u32);
            assert_eq!(get::<u32, _>(&storage, b"answer"), Some(42));
            assert!(storage.exists(b"answer"));
        })
    }

    #[test]
    fn typed_helpers_work_on_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(get::<u32, _>(&storage, b"k"), None);
        assert_eq!(get_or_default::<u32, _>(&storage, b"k"), 0);

        mutate::<u32, _, _>(&mut storage, b"k", |v| *v += 3);
        assert_eq!(get::<u32, _>(&storage, b"k"), Some(3));

        assert_eq!(take::<u32, _>(&mut storage, b"k"), Some(3));
        assert!(storage.is_empty());
    }

    #[test]
    fn corrupted_value_reads_as_absent() {
        let mut storage = MemoryStorage::new();
        storage.set(b"k", &[1, 2]);
        assert_eq!(get::<u32, _>(&storage, b"k"), None);
    }

    #[test]
    fn failed_transaction_is_rolled_back() {
        let mut storage = MemoryStorage::new();
        storage.set(b"before", &[1]);

        let result: Result<(), ()> = with_transaction(&mut storage, |s| {
            s.set(b"during", &[2]);
            s.clear(b"before");
            Err(())
        });

        assert!(result.is_err());
        assert_eq!(storage.get(b"before"), Some(vec![1]));
        assert_eq!(storage.get(b"during"), None);
    }

    #[test]
    fn successful_transaction_is_committed() {
        let mut storage = MemoryStorage::new();

        let result: Result<u8, ()> = with_transaction(&mut storage, |s| {
            s.set(b"during", &[2]);
            Ok(7)
        });

        assert_eq!(result, Ok(7));
        assert_eq!(storage.get(b"during"), Some(vec![2]));
    }

    #[test]
    fn host_transactions_roll_back_too() {
        sp_io::TestExternalities::new_empty().execute_with(|| {
            let mut storage = HostStorage;
            let result: Result<(), ()> = with_transaction(&mut storage, |s| {
                s.set(b"during", &[2]);
                Err(())
            });
            assert!(result.is_err());
            assert!(!storage.exists(b"during"));
        })
    }

    #[test]
    fn memory_and_host_roots_agree() {
        let mut memory = MemoryStorage::new();
        memory.set(b"alpha", b"one");
        memory.set(b"beta", b"two");

        let host_root = sp_io::TestExternalities::new_empty().execute_with(|| {
            let mut host = HostStorage;
            host.set(b"alpha", b"one");
            host.set(b"beta", b"two");
            host.root(StateVersion::V1)
        });

        assert_eq!(memory.root(StateVersion::V1), host_root);
    }
}
