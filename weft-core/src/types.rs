//! The common types that will be used across a Weft runtime, and not specific to any one
//! extension or call.
//!
//! Headers, digests, eras and dispatch errors are shared with the host node byte for byte,
//! so they come straight from `sp_runtime`.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};
use sp_core::sr25519;
use sp_runtime::traits::BlakeTwo256;
use sp_std::vec::Vec;

pub use sp_runtime::{
    generic::{Digest, DigestItem, Era},
    ConsensusEngineId, DispatchError,
};

/// Block numbers are plain 32 bit counters.
pub type BlockNumber = u32;
/// Per-account replay counter.
pub type Nonce = u32;
/// Token amounts.
pub type Balance = u128;
/// Block, state and extrinsics hashes.
pub type Hash = sp_core::H256;

/// A block header. The number is compact on the wire and the hash is blake2-256 over the
/// encoded header.
pub type Header = sp_runtime::generic::Header<BlockNumber, BlakeTwo256>;

/// A 32 byte account identifier. It doubles as the sr25519 public key that signs for the
/// account, and is otherwise opaque.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(
    Encode, Decode, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default, TypeInfo,
)]
pub struct AccountId(pub [u8; 32]);

impl From<[u8; 32]> for AccountId {
    fn from(raw: [u8; 32]) -> Self {
        Self(raw)
    }
}

impl From<sr25519::Public> for AccountId {
    fn from(public: sr25519::Public) -> Self {
        let mut raw = [0u8; 32];
        raw.copy_from_slice(AsRef::<[u8]>::as_ref(&public));
        Self(raw)
    }
}

impl From<AccountId> for sr25519::Public {
    fn from(account: AccountId) -> Self {
        sr25519::Public::from_raw(account.0)
    }
}

/// A copy of `digest` holding only its pre-runtime items, in their original order.
///
/// This is what the runtime keeps of an incoming header's digest. Seals are added after
/// execution and everything else is produced by the runtime itself.
pub fn pre_runtime_only(digest: &Digest) -> Digest {
    Digest {
        logs: digest
            .logs
            .iter()
            .filter(|item| item.as_pre_runtime().is_some())
            .cloned()
            .collect(),
    }
}

/// A full block, generic over the runtime's extrinsic format.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, TypeInfo)]
pub struct Block<Extrinsic> {
    pub header: Header,
    pub extrinsics: Vec<Extrinsic>,
}

/// The outcome of a dispatched call. Pre-dispatch effects are kept either way.
pub type DispatchOutcome = sp_runtime::DispatchResult;
