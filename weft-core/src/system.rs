//! The `System` pallet's bookkeeping storage.
//!
//! Only the lifecycle and the account store write here. Everything else reads through the
//! accessors below so the key layout lives in one place.

use crate::{
    storage::{self, Storage},
    storage_keys::{map_key, pallet_item_key},
    types::{BlockNumber, Digest, Hash},
    version::LastRuntimeUpgradeInfo,
};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_std::vec::Vec;

const PALLET: &str = "System";

/// Key of the running extrinsic index. Shared with the host.
pub const EXTRINSIC_INDEX: &[u8] = sp_storage::well_known_keys::EXTRINSIC_INDEX;

/// Where in the block the runtime currently is.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, TypeInfo)]
pub enum Phase {
    /// Applying the extrinsic with the given index.
    ApplyExtrinsic(u32),
    /// Closing the block.
    Finalization,
    /// Opening the block.
    Initialization,
}

/// Storage keys of the plain values.
pub mod keys {
    use super::*;

    pub fn number() -> [u8; 32] {
        pallet_item_key(PALLET, "Number")
    }

    pub fn parent_hash() -> [u8; 32] {
        pallet_item_key(PALLET, "ParentHash")
    }

    pub fn digest() -> [u8; 32] {
        pallet_item_key(PALLET, "Digest")
    }

    pub fn execution_phase() -> [u8; 32] {
        pallet_item_key(PALLET, "ExecutionPhase")
    }

    pub fn last_runtime_upgrade() -> [u8; 32] {
        pallet_item_key(PALLET, "LastRuntimeUpgrade")
    }

    pub fn block_hash(number: BlockNumber) -> Vec<u8> {
        map_key(PALLET, "BlockHash", &number)
    }

    pub fn extrinsic_data(index: u32) -> Vec<u8> {
        map_key(PALLET, "ExtrinsicData", &index)
    }
}

/// The number of the block being built or executed.
pub fn block_number<S: Storage>(storage: &S) -> BlockNumber {
    storage::get_or_default(storage, &keys::number())
}

pub fn parent_hash<S: Storage>(storage: &S) -> Hash {
    storage::get_or_default(storage, &keys::parent_hash())
}

pub fn digest<S: Storage>(storage: &S) -> Digest {
    storage::get_or_default(storage, &keys::digest())
}

pub fn execution_phase<S: Storage>(storage: &S) -> Option<Phase> {
    storage::get(storage, &keys::execution_phase())
}

pub fn last_runtime_upgrade<S: Storage>(storage: &S) -> Option<LastRuntimeUpgradeInfo> {
    storage::get(storage, &keys::last_runtime_upgrade())
}

/// The hash of block `number`, if it is still remembered.
pub fn block_hash<S: Storage>(storage: &S, number: BlockNumber) -> Option<Hash> {
    storage::get(storage, &keys::block_hash(number))
}

pub fn set_block_hash<S: Storage>(storage: &mut S, number: BlockNumber, hash: Hash) {
    storage::put(storage, &keys::block_hash(number), &hash)
}

/// The index of the next extrinsic to apply, if a block is open.
pub fn extrinsic_index<S: Storage>(storage: &S) -> Option<u32> {
    storage::get(storage, EXTRINSIC_INDEX)
}
