//! Limits how long a signed extrinsic stays valid.

use super::SignedExtension;
use crate::{
    storage::Storage,
    system,
    types::{AccountId, BlockNumber, Era, Hash},
    validity::{
        DispatchInfo, InvalidTransaction, TransactionValidity, TransactionValidityError,
        ValidTransaction,
    },
    version::RuntimeConfig,
};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// Carries the era on the wire and signs over the hash of its birth block.
///
/// Once the birth block falls out of the block hash window, the extrinsic can no longer be
/// checked and is rejected as ancient. A signer on a fork signed a different birth hash, so
/// its signature fails.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, TypeInfo)]
pub struct CheckMortality(pub Era);

impl CheckMortality {
    fn current<S: Storage>(storage: &S) -> u64 {
        system::block_number(storage) as u64
    }
}

impl<Call> SignedExtension<Call> for CheckMortality {
    const IDENTIFIER: &'static str = "CheckMortality";
    type AdditionalSigned = Hash;
    type Pre = ();

    fn additional_signed<S: Storage>(
        &self,
        _config: &RuntimeConfig,
        storage: &S,
    ) -> Result<Hash, TransactionValidityError> {
        let birth = self.0.birth(Self::current(storage));
        BlockNumber::try_from(birth)
            .ok()
            .and_then(|birth| system::block_hash(storage, birth))
            .ok_or(InvalidTransaction::AncientBirthBlock.into())
    }

    fn validate<S: Storage>(
        &self,
        _: &RuntimeConfig,
        storage: &S,
        _: &AccountId,
        _: &Call,
        _: &DispatchInfo,
        _: usize,
    ) -> TransactionValidity {
        let current = Self::current(storage);
        Ok(ValidTransaction {
            longevity: self.0.death(current).saturating_sub(current),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extensions::tests::CONFIG, storage::MemoryStorage, storage_keys};

    fn storage_at(number: BlockNumber) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        crate::storage::put(
            &mut storage,
            &storage_keys::pallet_item_key("System", "Number"),
            &number,
        );
        for n in 0..number {
            system::set_block_hash(&mut storage, n, Hash::repeat_byte(n as u8));
        }
        storage
    }

    fn additional(era: Era, storage: &MemoryStorage) -> Result<Hash, TransactionValidityError> {
        SignedExtension::<()>::additional_signed(&CheckMortality(era), &CONFIG, storage)
    }

    #[test]
    fn immortal_signs_over_genesis() {
        let storage = storage_at(10);
        assert_eq!(additional(Era::Immortal, &storage), Ok(Hash::repeat_byte(0)));
    }

    #[test]
    fn mortal_signs_over_the_birth_block() {
        let storage = storage_at(10);
        // Signed while block 8 was the best block.
        let era = Era::mortal(4, 8);
        assert_eq!(era.birth(10), 8);
        assert_eq!(additional(era, &storage), Ok(Hash::repeat_byte(8)));
    }

    #[test]
    fn forgotten_birth_block_is_ancient() {
        let mut storage = storage_at(10);
        storage.clear(&system::keys::block_hash(8));
        assert_eq!(
            additional(Era::mortal(4, 8), &storage),
            Err(InvalidTransaction::AncientBirthBlock.into())
        );
    }

    #[test]
    fn longevity_runs_until_death() {
        let storage = storage_at(10);
        let who = AccountId::default();
        let verdict = CheckMortality(Era::mortal(4, 8))
            .validate(&CONFIG, &storage, &who, &(), &DispatchInfo::default(), 0)
            .unwrap();
        assert_eq!(verdict.longevity, 2);

        let verdict = CheckMortality(Era::Immortal)
            .validate(&CONFIG, &storage, &who, &(), &DispatchInfo::default(), 0)
            .unwrap();
        assert_eq!(verdict.longevity, u64::MAX - 10);
    }

    #[test]
    fn pre_dispatch_writes_nothing() {
        let mut storage = storage_at(10);
        let before = storage.clone();
        assert_eq!(
            CheckMortality(Era::mortal(4, 8)).pre_dispatch(
                &CONFIG,
                &mut storage,
                &AccountId::default(),
                &(),
                &DispatchInfo::default(),
                0
            ),
            Ok(())
        );
        assert_eq!(storage, before);
    }
}
