//! A signed extension is a check that every signed extrinsic carries along with its call.
//! Each one contributes three things: data that is signed but never sent (so a signature
//! made for another chain or another runtime fails), a read-only validity verdict for the
//! transaction pool, and a pre-dispatch step that runs once in a block and may write state.
//!
//! Each runtime picks the extensions it wants and aggregates them into an enum, the same way
//! it aggregates its calls. The common ones are included here with Weft core.

use crate::{
    codec::Concat,
    storage::Storage,
    types::AccountId,
    validity::{DispatchInfo, TransactionValidity, TransactionValidityError, ValidTransaction},
    version::RuntimeConfig,
    LOG_TARGET,
};
use parity_scale_codec::Encode;
use sp_std::{fmt::Debug, vec::Vec};

mod charge_transaction_payment;
mod check_genesis;
mod check_mortality;
mod check_nonce;
mod check_spec_version;
mod check_tx_version;

pub use charge_transaction_payment::ChargeTransactionPayment;
pub use check_genesis::CheckGenesis;
pub use check_mortality::CheckMortality;
pub use check_nonce::CheckNonce;
pub use check_spec_version::CheckSpecVersion;
pub use check_tx_version::CheckTxVersion;

/// One check in the signed-extension pipeline.
///
/// `validate` must not write. It may run any number of times, speculatively, against any
/// state. `pre_dispatch` runs exactly once, right before the call is applied in a block.
pub trait SignedExtension<Call>: Debug + Clone {
    /// A short name used in logs.
    const IDENTIFIER: &'static str;

    /// Data appended to the signed payload but not to the extrinsic itself.
    type AdditionalSigned: Encode;

    /// Whatever `pre_dispatch` wants to hand on to later stages.
    type Pre: Default;

    /// The name of this particular extension. Aggregates override it to name the member
    /// they wrap.
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn additional_signed<S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &S,
    ) -> Result<Self::AdditionalSigned, TransactionValidityError>;

    /// Transaction pool validation. Permissive unless overridden.
    fn validate<S: Storage>(
        &self,
        _config: &RuntimeConfig,
        _storage: &S,
        _who: &AccountId,
        _call: &Call,
        _info: &DispatchInfo,
        _len: usize,
    ) -> TransactionValidity {
        Ok(ValidTransaction::default())
    }

    /// In-block check. Unless overridden it repeats `validate`, so whatever the pool would
    /// reject can never be applied either.
    fn pre_dispatch<S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &mut S,
        who: &AccountId,
        call: &Call,
        info: &DispatchInfo,
        len: usize,
    ) -> Result<Self::Pre, TransactionValidityError> {
        self.validate(config, &*storage, who, call, info, len)
            .map(|_| Self::Pre::default())
    }
}

/// A fixed-order sequence of extensions evaluated as one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionChain<E>(pub Vec<E>);

impl<E> ExtensionChain<E> {
    pub fn new(extensions: Vec<E>) -> Self {
        Self(extensions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The members' additional-signed values, encoded back to back in chain order. This is
    /// byte for byte the encoding of the tuple of those values.
    pub fn additional_signed<Call, S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &S,
    ) -> Result<Concat, TransactionValidityError>
    where
        E: SignedExtension<Call>,
    {
        let mut additional = Concat::default();
        for extension in &self.0 {
            additional.push(&extension.additional_signed(config, storage)?);
        }
        Ok(additional)
    }

    /// Validate with every member and combine the verdicts. The first error is returned
    /// as-is and later members are not consulted.
    pub fn validate<Call, S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &S,
        who: &AccountId,
        call: &Call,
        info: &DispatchInfo,
        len: usize,
    ) -> TransactionValidity
    where
        E: SignedExtension<Call>,
    {
        let mut combined = ValidTransaction::default();
        for extension in &self.0 {
            let verdict = extension
                .validate(config, storage, who, call, info, len)
                .map_err(|e| {
                    log::debug!(
                        target: LOG_TARGET,
                        "{} rejected transaction from {:?}: {:?}",
                        extension.identifier(),
                        who,
                        e
                    );
                    e
                })?;
            combined = combined.combine_with(verdict);
        }
        Ok(combined)
    }

    /// Run every member's pre-dispatch in order, stopping at the first error. Members after
    /// the failing one never run.
    ///
    /// Members before the failing one may already have written. Callers that need
    /// all-or-nothing semantics wrap this in a storage transaction.
    pub fn pre_dispatch<Call, S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &mut S,
        who: &AccountId,
        call: &Call,
        info: &DispatchInfo,
        len: usize,
    ) -> Result<Vec<E::Pre>, TransactionValidityError>
    where
        E: SignedExtension<Call>,
    {
        let mut pre = Vec::with_capacity(self.0.len());
        for extension in &self.0 {
            pre.push(extension.pre_dispatch(config, storage, who, call, info, len)?);
        }
        Ok(pre)
    }
}
