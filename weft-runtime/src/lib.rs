//! A minimal account-based runtime built with Weft.
//!
//! It has two calls, a remark and a code upgrade, and charges a fee for each signed
//! extrinsic. Everything interesting happens in the signed-extension pipeline and the block
//! lifecycle that Weft core provides; this crate picks the pieces and exposes them to the
//! host.

#![cfg_attr(not(feature = "std"), no_std)]

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_std::{borrow::Cow, vec::Vec};
use sp_storage::well_known_keys::CODE;

use weft_core::{
    storage::{self, Storage},
    system,
    types::{DigestItem, DispatchError, DispatchOutcome},
    validity::{DispatchClass, DispatchInfo, Pays},
    version::ApiId,
    RuntimeConfig, RuntimeVersion,
};

mod executive;
mod extra;
mod extrinsic;
#[cfg(feature = "std")]
pub mod genesis;
pub mod host_bridge;

pub use executive::Runtime;
pub use extra::{Extension, ExtensionPre, SignedExtra};
pub use extrinsic::{SignedPayload, UncheckedExtrinsic};

pub use weft_core::types::{AccountId, Balance, BlockNumber, Hash, Header, Nonce};

/// A log target used by the runtime's entry points and executive.
const LOG_TARGET: &str = "weft-runtime";

pub type Block = weft_core::types::Block<UncheckedExtrinsic>;

/// The runtime APIs this runtime answers, by id and version.
pub const RUNTIME_API_VERSIONS: &[(ApiId, u32)] = &[
    // Core
    ([0xdf, 0x6a, 0xcb, 0x68, 0x99, 0x07, 0x60, 0x9b], 4),
    // Metadata
    ([0x37, 0xe3, 0x97, 0xfc, 0x7c, 0x91, 0xf5, 0xe4], 1),
    // BlockBuilder
    ([0x40, 0xfe, 0x3a, 0xd4, 0x01, 0xf8, 0x95, 0x9a], 6),
    // TaggedTransactionQueue
    ([0xd2, 0xbc, 0x98, 0x97, 0xee, 0xd0, 0x8f, 0x15], 3),
    // AccountNonceApi
    ([0xbc, 0x9d, 0x89, 0x90, 0x4f, 0x5b, 0x92, 0x3f], 1),
];

/// This runtime version.
pub const VERSION: RuntimeVersion = RuntimeVersion {
    spec_name: Cow::Borrowed("weft-runtime"),
    impl_name: Cow::Borrowed("weft-runtime"),
    authoring_version: 1,
    spec_version: 100,
    impl_version: 1,
    apis: Cow::Borrowed(RUNTIME_API_VERSIONS),
    transaction_version: 1,
    system_version: 1,
};

/// Everything the core machinery is configured with.
pub const CONFIG: RuntimeConfig = RuntimeConfig {
    version: VERSION,
    block_hash_count: 2400,
};

/// Base weight of every call, before its length is accounted for.
const BASE_WEIGHT: u64 = 10_000;

/// The calls this runtime can dispatch.
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, TypeInfo)]
pub enum Call {
    /// Get included in a block and nothing else.
    Remark(Vec<u8>),
    /// Replace the runtime code with the given wasm blob.
    ///
    /// Anyone who can sign and pay may call this. A real chain wants governance in front.
    Upgrade(Vec<u8>),
}

impl Call {
    pub fn dispatch_info(&self) -> DispatchInfo {
        match self {
            Self::Remark(remark) => DispatchInfo {
                weight: BASE_WEIGHT.saturating_add(remark.len() as u64),
                class: DispatchClass::Normal,
                pays_fee: Pays::Yes,
            },
            Self::Upgrade(code) => DispatchInfo {
                weight: BASE_WEIGHT.saturating_add(code.len() as u64),
                class: DispatchClass::Operational,
                pays_fee: Pays::Yes,
            },
        }
    }

    /// Execute the call. Its writes are kept only if it succeeds.
    pub fn dispatch<S: Storage>(&self, storage: &mut S) -> DispatchOutcome {
        storage::with_transaction(storage, |storage| match self {
            Self::Remark(remark) => {
                log::debug!(target: LOG_TARGET, "Remark of {} bytes", remark.len());
                Ok(())
            }
            Self::Upgrade(code) => {
                weft_core::ensure!(!code.is_empty(), DispatchError::Other("empty code"));
                storage.set(CODE, code);

                let mut digest = system::digest(storage);
                digest.push(DigestItem::RuntimeEnvironmentUpdated);
                storage::put(storage, &system::keys::digest(), &digest);

                log::info!(target: LOG_TARGET, "Runtime code replaced");
                Ok(())
            }
        })
    }
}
