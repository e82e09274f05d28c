//! Ties a signature to the runtime's spec version.

use super::SignedExtension;
use crate::{storage::Storage, validity::TransactionValidityError, version::RuntimeConfig};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// Signs over the spec version without sending it.
///
/// There is nothing to check here directly. A signer that assumed a different spec version
/// signed a different payload, so its signature fails to verify.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default, TypeInfo)]
pub struct CheckSpecVersion;

impl<Call> SignedExtension<Call> for CheckSpecVersion {
    const IDENTIFIER: &'static str = "CheckSpecVersion";
    type AdditionalSigned = u32;
    type Pre = ();

    fn additional_signed<S: Storage>(
        &self,
        config: &RuntimeConfig,
        _storage: &S,
    ) -> Result<u32, TransactionValidityError> {
        Ok(config.version.spec_version)
    }
}
