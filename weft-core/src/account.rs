//! Per-account state, stored in the `System` pallet's `Account` map.

use crate::{
    storage::{self, Storage},
    storage_keys,
    types::{AccountId, Balance, Nonce},
    LOG_TARGET,
};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};
use sp_std::vec::Vec;

/// Balances held by an account.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default, TypeInfo)]
pub struct AccountData {
    pub free: Balance,
    pub reserved: Balance,
    pub frozen: Balance,
    pub flags: u128,
}

/// Everything stored for one account.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default, TypeInfo)]
pub struct Account {
    /// Number of signed extrinsics this account has had applied.
    pub nonce: Nonce,
    pub consumers: u32,
    pub providers: u32,
    pub sufficients: u32,
    pub data: AccountData,
}

/// The free balance is smaller than the amount to withdraw.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InsufficientBalance;

/// Typed access to the account map. Stateless; the storage is passed to every call.
pub struct AccountStore;

impl AccountStore {
    /// The storage key holding `who`'s account.
    pub fn key(who: &AccountId) -> Vec<u8> {
        storage_keys::map_key("System", "Account", who)
    }

    /// The account of `who`, or a fresh one if nothing is stored. Never writes.
    pub fn get<S: Storage>(storage: &S, who: &AccountId) -> Account {
        storage::get_or_default(storage, &Self::key(who))
    }

    pub fn set<S: Storage>(storage: &mut S, who: &AccountId, account: &Account) {
        storage::put(storage, &Self::key(who), account)
    }

    pub fn nonce<S: Storage>(storage: &S, who: &AccountId) -> Nonce {
        Self::get(storage, who).nonce
    }

    /// Bump `who`'s nonce by one and return the new value.
    pub fn increment_nonce<S: Storage>(storage: &mut S, who: &AccountId) -> Nonce {
        let nonce = storage::mutate(storage, &Self::key(who), |account: &mut Account| {
            account.nonce = account.nonce.saturating_add(1);
            account.nonce
        });
        log::debug!(target: LOG_TARGET, "Nonce of {:?} is now {}", who, nonce);
        nonce
    }

    /// Take `amount` out of `who`'s free balance. Nothing is written on failure.
    pub fn withdraw_fee<S: Storage>(
        storage: &mut S,
        who: &AccountId,
        amount: Balance,
    ) -> Result<(), InsufficientBalance> {
        let mut account = Self::get(storage, who);
        account.data.free = account
            .data
            .free
            .checked_sub(amount)
            .ok_or(InsufficientBalance)?;
        Self::set(storage, who, &account);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn alice() -> AccountId {
        AccountId([1u8; 32])
    }

    fn bob() -> AccountId {
        AccountId([2u8; 32])
    }

    #[test]
    fn reading_unknown_account_does_not_write() {
        let storage = MemoryStorage::new();
        assert_eq!(AccountStore::get(&storage, &alice()), Account::default());
        assert_eq!(AccountStore::nonce(&storage, &alice()), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn set_then_get() {
        let mut storage = MemoryStorage::new();
        let account = Account {
            nonce: 3,
            providers: 1,
            data: AccountData {
                free: 500,
                ..Default::default()
            },
            ..Default::default()
        };
        AccountStore::set(&mut storage, &alice(), &account);

        assert_eq!(AccountStore::get(&storage, &alice()), account);
        assert_eq!(AccountStore::get(&storage, &bob()), Account::default());
    }

    #[test]
    fn account_layout() {
        let account = Account {
            nonce: 1,
            ..Default::default()
        };
        let encoded = account.encode();
        assert_eq!(encoded.len(), 4 * 4 + 16 * 4);
        assert_eq!(encoded[..4], [1, 0, 0, 0]);
    }

    #[test]
    fn increment_nonce_bumps_by_one() {
        let mut storage = MemoryStorage::new();
        assert_eq!(AccountStore::increment_nonce(&mut storage, &alice()), 1);
        assert_eq!(AccountStore::increment_nonce(&mut storage, &alice()), 2);
        assert_eq!(AccountStore::nonce(&storage, &alice()), 2);
        assert_eq!(AccountStore::nonce(&storage, &bob()), 0);
    }

    #[test]
    fn increment_nonce_keeps_the_balance() {
        let mut storage = MemoryStorage::new();
        let mut account = Account::default();
        account.data.free = 77;
        AccountStore::set(&mut storage, &alice(), &account);

        AccountStore::increment_nonce(&mut storage, &alice());
        let after = AccountStore::get(&storage, &alice());
        assert_eq!(after.nonce, 1);
        assert_eq!(after.data.free, 77);
    }

    #[test]
    fn increment_nonce_saturates() {
        let mut storage = MemoryStorage::new();
        let account = Account {
            nonce: Nonce::MAX,
            ..Default::default()
        };
        AccountStore::set(&mut storage, &alice(), &account);
        assert_eq!(AccountStore::increment_nonce(&mut storage, &alice()), Nonce::MAX);
    }

    #[test]
    fn withdraw_fee_checks_the_free_balance() {
        let mut storage = MemoryStorage::new();
        let mut account = Account::default();
        account.data.free = 100;
        AccountStore::set(&mut storage, &alice(), &account);

        assert_eq!(AccountStore::withdraw_fee(&mut storage, &alice(), 40), Ok(()));
        assert_eq!(AccountStore::get(&storage, &alice()).data.free, 60);

        assert_eq!(
            AccountStore::withdraw_fee(&mut storage, &alice(), 61),
            Err(InsufficientBalance)
        );
        assert_eq!(AccountStore::get(&storage, &alice()).data.free, 60);
    }

    #[test]
    fn works_through_host_storage() {
        sp_io::TestExternalities::new_empty().execute_with(|| {
            let mut storage = crate::storage::HostStorage;
            AccountStore::increment_nonce(&mut storage, &alice());
            assert_eq!(
                sp_io::storage::get(&AccountStore::key(&alice())).map(|v| v.to_vec()),
                Some(Account { nonce: 1, ..Default::default() }.encode())
            );
        })
    }
}
