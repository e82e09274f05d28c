//! Fee payment.

use super::SignedExtension;
use crate::{
    account::AccountStore,
    ensure,
    storage::Storage,
    types::{AccountId, Balance},
    validity::{
        DispatchInfo, InvalidTransaction, Pays, TransactionPriority, TransactionValidity,
        TransactionValidityError, ValidTransaction,
    },
    version::RuntimeConfig,
    LOG_TARGET,
};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// The fee the signer offers. It is taken from their free balance before the call runs, and
/// what is actually charged doubles as the transaction's priority in the pool.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, TypeInfo)]
pub struct ChargeTransactionPayment(#[codec(compact)] pub u64);

impl ChargeTransactionPayment {
    /// What is actually charged. Calls that declare they do not pay are free.
    fn fee(&self, info: &DispatchInfo) -> Balance {
        match info.pays_fee {
            Pays::Yes => Balance::from(self.0),
            Pays::No => 0,
        }
    }
}

impl<Call> SignedExtension<Call> for ChargeTransactionPayment {
    const IDENTIFIER: &'static str = "ChargeTransactionPayment";
    type AdditionalSigned = ();
    /// The amount withdrawn.
    type Pre = Balance;

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
        info: &DispatchInfo,
        _: usize,
    ) -> TransactionValidity {
        let fee = self.fee(info);
        ensure!(
            fee <= AccountStore::get(storage, who).data.free,
            InvalidTransaction::Payment
        );

        Ok(ValidTransaction {
            priority: TransactionPriority::try_from(fee).unwrap_or(TransactionPriority::MAX),
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
    ) -> Result<Balance, TransactionValidityError> {
        self.validate(config, &*storage, who, call, info, len)?;

        let fee = self.fee(info);
        AccountStore::withdraw_fee(storage, who, fee)
            .map_err(|_| InvalidTransaction::Payment)?;
        log::debug!(target: LOG_TARGET, "Charged {:?} a fee of {}", who, fee);

        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{account::Account, extensions::tests::CONFIG, storage::MemoryStorage};

    fn alice() -> AccountId {
        AccountId([1u8; 32])
    }

    fn storage_with_free(free: Balance) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        let mut account = Account::default();
        account.data.free = free;
        AccountStore::set(&mut storage, &alice(), &account);
        storage
    }

    #[test]
    fn fee_becomes_priority() {
        let storage = storage_with_free(1_000);
        let verdict = ChargeTransactionPayment(250)
            .validate(&CONFIG, &storage, &alice(), &(), &DispatchInfo::default(), 0)
            .unwrap();
        assert_eq!(verdict.priority, 250);
    }

    #[test]
    fn fee_is_withdrawn_in_pre_dispatch() {
        let mut storage = storage_with_free(1_000);
        let pre = ChargeTransactionPayment(250).pre_dispatch(
            &CONFIG,
            &mut storage,
            &alice(),
            &(),
            &DispatchInfo::default(),
            0,
        );
        assert_eq!(pre, Ok(250));
        assert_eq!(AccountStore::get(&storage, &alice()).data.free, 750);
    }

    #[test]
    fn cannot_pay_more_than_free_balance() {
        let mut storage = storage_with_free(100);
        let result = ChargeTransactionPayment(101).pre_dispatch(
            &CONFIG,
            &mut storage,
            &alice(),
            &(),
            &DispatchInfo::default(),
            0,
        );
        assert_eq!(result, Err(InvalidTransaction::Payment.into()));
        assert_eq!(AccountStore::get(&storage, &alice()).data.free, 100);
    }

    #[test]
    fn calls_that_do_not_pay_are_free() {
        let mut storage = MemoryStorage::new();
        let info = DispatchInfo {
            pays_fee: Pays::No,
            ..Default::default()
        };
        let pre = ChargeTransactionPayment(5).pre_dispatch(
            &CONFIG,
            &mut storage,
            &alice(),
            &(),
            &info,
            0,
        );
        assert_eq!(pre, Ok(0));
    }

    #[test]
    fn free_calls_get_no_priority() {
        let storage = MemoryStorage::new();
        let info = DispatchInfo {
            pays_fee: Pays::No,
            ..Default::default()
        };
        let verdict = ChargeTransactionPayment(5)
            .validate(&CONFIG, &storage, &alice(), &(), &info, 0)
            .unwrap();
        assert_eq!(verdict.priority, 0);
    }
}
