//! The boundary between the host node and this runtime.
//!
//! Every entry point receives a pointer and a length describing its SCALE-encoded arguments
//! in linear memory, and returns the encoded result the same way, packed into one `u64` as
//! `pointer << 32 | length`. Ownership of the result buffer passes to the host.
//!
//! [`call`] holds the actual dispatch and works against any [`Storage`], so the whole
//! boundary can be exercised natively. The wasm exports below are thin wrappers around it.

use crate::{Block, Runtime, UncheckedExtrinsic, LOG_TARGET};
use parity_scale_codec::Encode;
use sp_std::vec::Vec;
use weft_core::{
    codec::{decode_all, DecodeError},
    types::{AccountId, Hash, Header},
    validity::TransactionSource,
    LifecycleError, Storage,
};

/// Why an entry point produced no result. The host sees any of these as a failed call.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BridgeError {
    /// No entry point has the requested name.
    UnknownEntryPoint,
    /// The argument bytes do not decode. Nothing was written.
    Decode(DecodeError),
    /// The call broke the block lifecycle.
    Fatal(LifecycleError),
}

impl From<DecodeError> for BridgeError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<LifecycleError> for BridgeError {
    fn from(e: LifecycleError) -> Self {
        Self::Fatal(e)
    }
}

/// The names of every exported entry point.
pub const ENTRY_POINTS: &[&str] = &[
    "Core_version",
    "Core_initialize_block",
    "Core_execute_block",
    "BlockBuilder_apply_extrinsic",
    "BlockBuilder_finalize_block",
    "TaggedTransactionQueue_validate_transaction",
    "AccountNonceApi_account_nonce",
    "Metadata_metadata",
];

pub fn pack_ptr_and_len(ptr: u32, len: u32) -> u64 {
    (u64::from(ptr) << 32) | u64::from(len)
}

pub fn unpack_ptr_and_len(packed: u64) -> (u32, u32) {
    ((packed >> 32) as u32, packed as u32)
}

/// Run the entry point `entry_point` on the encoded arguments `input` and return the encoded
/// result.
///
/// Arguments are fully decoded before anything touches storage.
pub fn call<S: Storage>(
    storage: &mut S,
    entry_point: &str,
    input: &[u8],
) -> Result<Vec<u8>, BridgeError> {
    log::debug!(
        target: LOG_TARGET,
        "Host called {} with {} bytes",
        entry_point,
        input.len()
    );

    let output = match entry_point {
        "Core_version" => {
            decode_all::<()>(input)?;
            Runtime::version().encode()
        }
        "Core_initialize_block" => {
            let header: Header = decode_all(input)?;
            Runtime::initialize_block(storage, &header)?;
            ().encode()
        }
        "Core_execute_block" => {
            let block: Block = decode_all(input)?;
            Runtime::execute_block(storage, &block)?;
            ().encode()
        }
        "BlockBuilder_apply_extrinsic" => {
            let extrinsic: UncheckedExtrinsic = decode_all(input)?;
            Runtime::apply_extrinsic(storage, &extrinsic)?.encode()
        }
        "BlockBuilder_finalize_block" => {
            decode_all::<()>(input)?;
            Runtime::finalize_block(storage)?.encode()
        }
        "TaggedTransactionQueue_validate_transaction" => {
            let (source, extrinsic, block_hash): (TransactionSource, UncheckedExtrinsic, Hash) =
                decode_all(input)?;
            Runtime::validate_transaction(storage, source, &extrinsic, block_hash).encode()
        }
        "AccountNonceApi_account_nonce" => {
            let who: AccountId = decode_all(input)?;
            Runtime::account_nonce(storage, &who).encode()
        }
        "Metadata_metadata" => {
            decode_all::<()>(input)?;
            Runtime::metadata().encode()
        }
        _ => return Err(BridgeError::UnknownEntryPoint),
    };

    Ok(output)
}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
mod exports {
    use super::*;
    use weft_core::storage::HostStorage;

    /// Take ownership of the argument buffer, run the entry point and hand the result
    /// buffer to the host. Any failure aborts the call.
    unsafe fn run(entry_point: &str, ptr: u32, len: u32) -> u64 {
        let input = sp_std::boxed::Box::from_raw(sp_std::slice::from_raw_parts_mut(
            ptr as *mut u8,
            len as usize,
        ));

        match call(&mut HostStorage, entry_point, &input) {
            Ok(output) => {
                let packed = pack_ptr_and_len(output.as_ptr() as u32, output.len() as u32);
                sp_std::mem::forget(output);
                packed
            }
            Err(e) => panic!("{} failed: {:?}", entry_point, e),
        }
    }

    macro_rules! export_entry_points {
        ( $( $name:ident ),* $(,)? ) => {
            $(
                #[no_mangle]
                #[allow(non_snake_case)]
                pub unsafe extern "C" fn $name(ptr: u32, len: u32) -> u64 {
                    run(stringify!($name), ptr, len)
                }
            )*
        };
    }

    export_entry_points!(
        Core_version,
        Core_initialize_block,
        Core_execute_block,
        BlockBuilder_apply_extrinsic,
        BlockBuilder_finalize_block,
        TaggedTransactionQueue_validate_transaction,
        AccountNonceApi_account_nonce,
        Metadata_metadata,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{codec::DecodeErrorReason, storage::MemoryStorage};

    #[test]
    fn packing_round_trips() {
        let packed = pack_ptr_and_len(0x1234, 0x20);
        assert_eq!(packed, 0x0000_1234_0000_0020);
        assert_eq!(unpack_ptr_and_len(packed), (0x1234, 0x20));
        assert_eq!(
            unpack_ptr_and_len(pack_ptr_and_len(u32::MAX, u32::MAX)),
            (u32::MAX, u32::MAX)
        );
    }

    #[test]
    fn unknown_entry_point() {
        let mut storage = MemoryStorage::new();
        assert_eq!(
            call(&mut storage, "Core_nonsense", &[]),
            Err(BridgeError::UnknownEntryPoint)
        );
    }

    #[test]
    fn every_entry_point_is_routed() {
        for name in ENTRY_POINTS {
            let mut storage = MemoryStorage::new();
            assert_ne!(
                call(&mut storage, name, &[0xff; 3]),
                Err(BridgeError::UnknownEntryPoint),
                "{name}"
            );
        }
    }

    #[test]
    fn undecodable_header_writes_nothing() {
        let mut storage = MemoryStorage::new();
        let result = call(&mut storage, "Core_initialize_block", &[0u8; 10]);
        assert_eq!(
            result,
            Err(BridgeError::Decode(DecodeError::new(
                DecodeErrorReason::BufferTooShort
            )))
        );
        assert!(storage.is_empty());
    }

    #[test]
    fn trailing_arguments_are_rejected() {
        let mut storage = MemoryStorage::new();
        let mut input = AccountId([1u8; 32]).encode();
        input.push(0);
        assert_eq!(
            call(&mut storage, "AccountNonceApi_account_nonce", &input),
            Err(BridgeError::Decode(DecodeError::new(
                DecodeErrorReason::TrailingInput
            )))
        );
    }

    #[test]
    fn metadata_is_an_empty_blob() {
        let mut storage = MemoryStorage::new();
        assert_eq!(call(&mut storage, "Metadata_metadata", &[]), Ok(vec![0]));
    }
}
