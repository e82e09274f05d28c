//! Replay protection.

use super::SignedExtension;
use crate::{
    account::AccountStore,
    ensure,
    storage::Storage,
    types::{AccountId, Nonce},
    validity::{
        DispatchInfo, InvalidTransaction, TransactionValidity, TransactionValidityError,
        ValidTransaction,
    },
    version::RuntimeConfig,
};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_std::vec;

/// The nonce the signer claims to be at. It must match the stored one exactly.
///
/// Validation only compares. The stored nonce is bumped in `pre_dispatch`, once the
/// extrinsic is actually going into a block.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, TypeInfo)]
pub struct CheckNonce(#[codec(compact)] pub Nonce);

impl<Call> SignedExtension<Call> for CheckNonce {
    const IDENTIFIER: &'static str = "CheckNonce";
    type AdditionalSigned = ();
    type Pre = ();

    fn additional_signed<S: Storage>(
        &self,
        _: &RuntimeConfig,
        _: &S,
    ) -> Result<(), TransactionValidityError> {
        Ok(())
    }

    fn validate<S: Storage>(
        &self,
        _: &RuntimeConfig,
        storage: &S,
        who: &AccountId,
        _: &Call,
        _: &DispatchInfo,
        _: usize,
    ) -> TransactionValidity {
        let stored = AccountStore::nonce(storage, who);
        ensure!(self.0 >= stored, InvalidTransaction::Stale);
        ensure!(self.0 <= stored, InvalidTransaction::Future);

        Ok(ValidTransaction {
            provides: vec![(who, self.0).encode()],
            ..Default::default()
        })
    }

    fn pre_dispatch<S: Storage>(
        &self,
        config: &RuntimeConfig,
        storage: &mut S,
        who: &AccountId,
        call: &Call,
        info: &DispatchInfo,
        len: usize,
    ) -> Result<(), TransactionValidityError> {
        self.validate(config, &*storage, who, call, info, len)?;
        AccountStore::increment_nonce(storage, who);
        Ok(())
    }
}
