//! The verdicts the signed-extension pipeline hands back to the transaction pool and the
//! block builder, and what a call declares about itself.
//!
//! The verdicts are shared with the host node and come from `sp_runtime`. The tests below
//! pin the layouts this runtime relies on.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

pub use sp_runtime::{
    transaction_validity::{
        InvalidTransaction, TransactionLongevity, TransactionPriority, TransactionSource,
        TransactionTag, TransactionValidity, TransactionValidityError, UnknownTransaction,
        ValidTransaction,
    },
    ApplyExtrinsicResult,
};

/// Whether a call belongs to ordinary traffic, privileged operations, or must be included.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default, TypeInfo)]
pub enum DispatchClass {
    #[default]
    Normal,
    Operational,
    Mandatory,
}

#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default, TypeInfo)]
pub enum Pays {
    #[default]
    Yes,
    No,
}

/// What a call declares about itself. Extensions only read it.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default, TypeInfo)]
pub struct DispatchInfo {
    pub weight: u64,
    pub class: DispatchClass,
    pub pays_fee: Pays,
}
