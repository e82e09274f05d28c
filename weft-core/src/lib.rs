//! This crate is the core of the Weft runtime framework.
//!
//! It holds everything a Weft runtime needs before it can validate and apply a single
//! extrinsic: the SCALE codec helpers, the hashed storage-key scheme, the account store,
//! the signed-extension pipeline and the System bookkeeping that brackets every block.
//! Concrete runtimes plug in their own `Call` type and aggregate the extensions they want.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod account;
pub mod codec;
pub mod extensions;
pub mod lifecycle;
pub mod storage;
pub mod storage_keys;
pub mod system;
pub mod types;
pub mod validity;
pub mod version;

mod support_macros;

pub use account::{Account, AccountData, AccountStore};
pub use codec::DecodeError;
pub use extensions::{ExtensionChain, SignedExtension};
pub use lifecycle::LifecycleError;
pub use storage::Storage;
pub use version::{RuntimeConfig, RuntimeVersion};

/// A log target used by all the core machinery.
const LOG_TARGET: &str = "weft";
