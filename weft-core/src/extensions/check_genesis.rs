use super::SignedExtension;
use crate::{
    storage::Storage,
    system,
    types::Hash,
    validity::TransactionValidityError,
    version::RuntimeConfig,
};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// Signs over the genesis hash, so a signature is only good on one chain.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default, TypeInfo)]
pub struct CheckGenesis;

impl<Call> SignedExtension<Call> for CheckGenesis {
    const IDENTIFIER: &'static str = "CheckGenesis";
    type AdditionalSigned = Hash;
    type Pre = ();

    fn additional_signed<S: Storage>(
        &self,
        _config: &RuntimeConfig,
        storage: &S,
    ) -> Result<Hash, TransactionValidityError> {
        Ok(system::block_hash(storage, 0).unwrap_or_default())
    }
}
