use super::SignedExtension;
use crate::{storage::Storage, validity::TransactionValidityError, version::RuntimeConfig};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// Signs over the transaction version, so a wallet built for an older extrinsic format
/// produces signatures this runtime rejects.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default, TypeInfo)]
pub struct CheckTxVersion;

impl<Call> SignedExtension<Call> for CheckTxVersion {
    const IDENTIFIER: &'static str = "CheckTxVersion";
    type AdditionalSigned = u32;
    type Pre = ();

    fn additional_signed<S: Storage>(
        &self,
        config: &RuntimeConfig,
        _storage: &S,
    ) -> Result<u32, TransactionValidityError> {
        Ok(config.version.transaction_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extensions::tests::CONFIG, storage::MemoryStorage};

    #[test]
    fn signs_over_the_transaction_version() {
        let storage = MemoryStorage::new();
        assert_eq!(
            SignedExtension::<()>::additional_signed(&CheckTxVersion, &CONFIG, &storage),
            Ok(7)
        );
    }
}
