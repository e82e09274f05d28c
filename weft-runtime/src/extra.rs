//! The signed extensions this runtime runs, aggregated into one enum.

use crate::Call;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};
use sp_std::vec;
use weft_core::{
    codec::Concat,
    extensions::{
        ChargeTransactionPayment, CheckGenesis, CheckMortality, CheckNonce, CheckSpecVersion,
        CheckTxVersion,
    },
    storage::Storage,
    types::{AccountId, Balance, Era, Nonce},
    validity::{DispatchInfo, TransactionValidity, TransactionValidityError},
    ExtensionChain, RuntimeConfig, SignedExtension,
};

/// What a signer attaches to every extrinsic besides the call and the signature.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, TypeInfo)]
pub struct SignedExtra {
    pub era: Era,
    #[codec(compact)]
    pub nonce: Nonce,
    #[codec(compact)]
    pub fee: u64,
}

impl SignedExtra {
    pub fn new(era: Era, nonce: Nonce, fee: u64) -> Self {
        Self { era, nonce, fee }
    }

    /// The extension chain this extra describes. The order is part of the signed payload
    /// and must not change without bumping the transaction version.
    pub fn extensions(&self) -> ExtensionChain<Extension> {
        ExtensionChain::new(vec![
            Extension::CheckSpecVersion(CheckSpecVersion),
            Extension::CheckTxVersion(CheckTxVersion),
            Extension::CheckGenesis(CheckGenesis),
            Extension::CheckMortality(CheckMortality(self.era)),
            Extension::CheckNonce(CheckNonce(self.nonce)),
            Extension::ChargeTransactionPayment(ChargeTransactionPayment(self.fee)),
        ])
    }
}

/// Every signed extension this runtime knows about.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Extension {
    CheckSpecVersion(CheckSpecVersion),
    CheckTxVersion(CheckTxVersion),
    CheckGenesis(CheckGenesis),
    CheckMortality(CheckMortality),
    CheckNonce(CheckNonce),
    ChargeTransactionPayment(ChargeTransactionPayment),
}

/// What the aggregated extensions pass on from pre-dispatch.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum ExtensionPre {
    #[default]
    Nothing,
    /// The fee that was withdrawn.
    Charged(Balance),
}

fn encoded<E: SignedExtension<Call>, S: Storage>(
    extension: &E,
    config: &RuntimeConfig,
    storage: &S,
) -> Result<Concat, TransactionValidityError> {
    let mut additional = Concat::default();
    additional.push(&extension.additional_signed(config, storage)?);
    Ok(additional)
}

impl SignedExtension<Call> for Extension {
    const IDENTIFIER: &'static str = "Extension";
    type AdditionalSigned = Concat;
    type Pre = ExtensionPre;

    fn identifier(&self) -> &'static str {
        match self {
            Self::CheckSpecVersion(inner) => SignedExtension::<Call>::identifier(inner),
            Self::CheckTxVersion(inner) => SignedExtension::<Call>::identifier(inner),
            Self::CheckGenesis(inner) => SignedExtension::<Call>::identifier(inner),
            Self::CheckMortality(inner) => SignedExtension::<Call>::identifier(inner),
            Self::CheckNonce(inner) => SignedExtension::<Call>::identifier(inner),
            Self::ChargeTransactionPayment(inner) => SignedExtension::<Call>::identifier(inner),
        }
    }

    fn additional_signed<S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &S,
    ) -> Result<Concat, TransactionValidityError> {
        match self {
            Self::CheckSpecVersion(inner) => encoded(inner, config, storage),
            Self::CheckTxVersion(inner) => encoded(inner, config, storage),
            Self::CheckGenesis(inner) => encoded(inner, config, storage),
            Self::CheckMortality(inner) => encoded(inner, config, storage),
            Self::CheckNonce(inner) => encoded(inner, config, storage),
            Self::ChargeTransactionPayment(inner) => encoded(inner, config, storage),
        }
    }

    fn validate<S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &S,
        who: &AccountId,
        call: &Call,
        info: &DispatchInfo,
        len: usize,
    ) -> TransactionValidity {
        match self {
            Self::CheckSpecVersion(inner) => inner.validate(config, storage, who, call, info, len),
            Self::CheckTxVersion(inner) => inner.validate(config, storage, who, call, info, len),
            Self::CheckGenesis(inner) => inner.validate(config, storage, who, call, info, len),
            Self::CheckMortality(inner) => inner.validate(config, storage, who, call, info, len),
            Self::CheckNonce(inner) => inner.validate(config, storage, who, call, info, len),
            Self::ChargeTransactionPayment(inner) => {
                inner.validate(config, storage, who, call, info, len)
            }
        }
    }

    fn pre_dispatch<S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &mut S,
        who: &AccountId,
        call: &Call,
        info: &DispatchInfo,
        len: usize,
    ) -> Result<ExtensionPre, TransactionValidityError> {
        log::trace!(
            target: crate::LOG_TARGET,
            "Pre-dispatch {} for {:?}",
            self.identifier(),
            who
        );
        match self {
            Self::CheckSpecVersion(inner) => inner
                .pre_dispatch(config, storage, who, call, info, len)
                .map(|()| ExtensionPre::Nothing),
            Self::CheckTxVersion(inner) => inner
                .pre_dispatch(config, storage, who, call, info, len)
                .map(|()| ExtensionPre::Nothing),
            Self::CheckGenesis(inner) => inner
                .pre_dispatch(config, storage, who, call, info, len)
                .map(|()| ExtensionPre::Nothing),
            Self::CheckMortality(inner) => inner
                .pre_dispatch(config, storage, who, call, info, len)
                .map(|()| ExtensionPre::Nothing),
            Self::CheckNonce(inner) => inner
                .pre_dispatch(config, storage, who, call, info, len)
                .map(|()| ExtensionPre::Nothing),
            Self::ChargeTransactionPayment(inner) => inner
                .pre_dispatch(config, storage, who, call, info, len)
                .map(ExtensionPre::Charged),
        }
    }
}
