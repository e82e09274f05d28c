//! Deterministic storage keys.
//!
//! A plain value lives at `twox128(pallet) ++ twox128(item)`. A map entry appends
//! `twox64(encoded sub key) ++ encoded sub key`, so the host can iterate a whole map by
//! prefix and the original sub key can be read back out of the storage key.

use parity_scale_codec::Encode;
use sp_io::hashing::{twox_128, twox_64};
use sp_std::vec::Vec;

/// Join a pre-hashed pallet name and item name into a value key.
pub fn value_key_from_hashes(pallet_hash: &[u8; 16], item_hash: &[u8; 16]) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[..16].copy_from_slice(pallet_hash);
    key[16..].copy_from_slice(item_hash);
    key
}

/// Extend a value key into a map key given the already hashed and encoded sub key.
pub fn map_key_from_prefix(prefix: &[u8], sub_key_hash: &[u8; 8], sub_key: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + sub_key_hash.len() + sub_key.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(sub_key_hash);
    key.extend_from_slice(sub_key);
    key
}

/// The key of a plain storage value.
pub fn pallet_item_key(pallet: &str, item: &str) -> [u8; 32] {
    value_key_from_hashes(&twox_128(pallet.as_bytes()), &twox_128(item.as_bytes()))
}

/// The key of one entry in a `Twox64Concat` storage map.
pub fn map_key<K: Encode + ?Sized>(pallet: &str, item: &str, sub_key: &K) -> Vec<u8> {
    let encoded = sub_key.encode();
    map_key_from_prefix(&pallet_item_key(pallet, item), &twox_64(&encoded), &encoded)
}
