//! # Executive
//!
//! The executive is the main orchestrator for the entire runtime. It has functions that
//! implement the Core, BlockBuilder, TaggedTransactionQueue and AccountNonceApi runtime
//! APIs, each taking the storage it works on as its first argument.
//!
//! Signature checking lives here, not in an extension: the signed payload is the call, the
//! signed extra and every extension's additional-signed data, so it can only be assembled
//! once the whole chain is known.

use crate::{
    extrinsic::SignedPayload, Block, Call, SignedExtra, UncheckedExtrinsic, CONFIG, LOG_TARGET,
    VERSION,
};
use log::info;
use parity_scale_codec::Encode;
use sp_core::sr25519;
use sp_std::vec::Vec;
use weft_core::{
    ensure, lifecycle,
    storage::{self, Storage},
    system::{self, Phase},
    types::{AccountId, Hash, Header, Nonce},
    validity::{
        ApplyExtrinsicResult, InvalidTransaction, TransactionSource, TransactionValidity,
        TransactionValidityError, UnknownTransaction,
    },
    AccountStore, LifecycleError, RuntimeVersion,
};

/// The main struct in this module.
pub struct Runtime;

impl Runtime {
    pub fn version() -> RuntimeVersion {
        VERSION
    }

    // These next three methods are for the block authoring workflow.
    // Open the block, apply zero or more extrinsics, close the block.

    pub fn initialize_block<S: Storage>(
        storage: &mut S,
        header: &Header,
    ) -> Result<(), LifecycleError> {
        lifecycle::initialize_block(&CONFIG, storage, header)
    }

    /// Check, pre-dispatch and dispatch one extrinsic in the open block.
    ///
    /// The outer error is reserved for a broken call sequence. An extrinsic that fails its
    /// checks comes back as `Ok(Err(_))`, leaves no trace in storage and is not part of
    /// the block.
    pub fn apply_extrinsic<S: Storage>(
        storage: &mut S,
        extrinsic: &UncheckedExtrinsic,
    ) -> Result<ApplyExtrinsicResult, LifecycleError> {
        info!(
            target: LOG_TARGET,
            "Entering apply_extrinsic: {:?}", extrinsic
        );
        ensure!(
            matches!(
                system::execution_phase(storage),
                Some(Phase::ApplyExtrinsic(_))
            ),
            LifecycleError::NotInitialized
        );

        let encoded = extrinsic.encode();
        let result = Self::check_and_dispatch(storage, extrinsic, encoded.len());
        match &result {
            Ok(outcome) => {
                lifecycle::note_applied_extrinsic(storage, &encoded)?;
                log::debug!(target: LOG_TARGET, "Dispatch outcome: {:?}", outcome);
            }
            Err(e) => log::debug!(target: LOG_TARGET, "Extrinsic rejected: {:?}", e),
        }

        Ok(result)
    }

    pub fn finalize_block<S: Storage>(storage: &mut S) -> Result<Header, LifecycleError> {
        lifecycle::finalize_block(&CONFIG, storage)
    }

    // This one is for the Core api. It is used to import blocks authored by foreign nodes.
    pub fn execute_block<S: Storage>(storage: &mut S, block: &Block) -> Result<(), LifecycleError> {
        info!(
            target: LOG_TARGET,
            "Entering execute_block {:?}. block: {:?}",
            block.header.hash(),
            block
        );

        Self::initialize_block(storage, &block.header)?;

        for extrinsic in &block.extrinsics {
            if let Err(e) = Self::apply_extrinsic(storage, extrinsic)? {
                log::error!(
                    target: LOG_TARGET,
                    "Block {} contains an invalid extrinsic: {:?}",
                    block.header.number,
                    e
                );
                return Err(LifecycleError::InvalidExtrinsic(e));
            }
        }

        let header = Self::finalize_block(storage)?;

        ensure!(
            header.extrinsics_root == block.header.extrinsics_root,
            LifecycleError::ExtrinsicsRootMismatch
        );
        if header.state_root != block.header.state_root {
            log::error!(
                target: LOG_TARGET,
                "State root mismatch. computed: {:?}, claimed: {:?}",
                header.state_root,
                block.header.state_root
            );
            return Err(LifecycleError::StateRootMismatch);
        }

        Ok(())
    }

    // This one is the pool api. It is used to make preliminary checks in the transaction pool.
    //
    // Validation happens as if building on top of the block `block_hash`. That block's hash
    // and number are staged in a storage transaction that is always rolled back, so the
    // pool never leaves anything behind.
    pub fn validate_transaction<S: Storage>(
        storage: &mut S,
        source: TransactionSource,
        extrinsic: &UncheckedExtrinsic,
        block_hash: Hash,
    ) -> TransactionValidity {
        log::debug!(
            target: LOG_TARGET,
            "Entering validate_transaction. source: {:?}, tx: {:?}, block hash: {:?}",
            source,
            extrinsic,
            block_hash
        );

        storage.start_transaction();
        let best = system::block_number(storage);
        system::set_block_hash(storage, best, block_hash);
        storage::put(storage, &system::keys::number(), &best.saturating_add(1));

        let validity = Self::check_for_pool(&*storage, extrinsic);
        storage.rollback_transaction();

        log::debug!(target: LOG_TARGET, "Validation result: {:?}", validity);
        validity
    }

    pub fn account_nonce<S: Storage>(storage: &S, who: &AccountId) -> Nonce {
        AccountStore::nonce(storage, who)
    }

    /// This runtime does not describe itself yet.
    pub fn metadata() -> Vec<u8> {
        Vec::new()
    }

    fn check_for_pool<S: Storage>(
        storage: &S,
        extrinsic: &UncheckedExtrinsic,
    ) -> TransactionValidity {
        let (who, signature, extra) = extrinsic
            .signature
            .as_ref()
            .ok_or(UnknownTransaction::NoUnsignedValidator)?;

        Self::verify_signature(storage, who, signature, extra, &extrinsic.function)?;

        extra.extensions().validate(
            &CONFIG,
            storage,
            who,
            &extrinsic.function,
            &extrinsic.function.dispatch_info(),
            extrinsic.encoded_size(),
        )
    }

    fn check_and_dispatch<S: Storage>(
        storage: &mut S,
        extrinsic: &UncheckedExtrinsic,
        len: usize,
    ) -> ApplyExtrinsicResult {
        let (who, signature, extra) = extrinsic
            .signature
            .as_ref()
            .ok_or(UnknownTransaction::NoUnsignedValidator)?;
        let call = &extrinsic.function;

        Self::verify_signature(&*storage, who, signature, extra, call)?;

        let info = call.dispatch_info();
        let extensions = extra.extensions();
        storage::with_transaction(storage, |storage| {
            extensions.pre_dispatch(&CONFIG, storage, who, call, &info, len)
        })?;

        Ok(call.dispatch(storage))
    }

    fn verify_signature<S: Storage>(
        storage: &S,
        who: &AccountId,
        signature: &sr25519::Signature,
        extra: &SignedExtra,
        call: &Call,
    ) -> Result<(), TransactionValidityError> {
        let additional = extra
            .extensions()
            .additional_signed::<Call, _>(&CONFIG, storage)?;
        let payload = SignedPayload::new(call, extra, additional);
        let public: sr25519::Public = (*who).into();

        ensure!(
            payload.using_encoded(|message| sp_io::crypto::sr25519_verify(
                signature, message, &public
            )),
            InvalidTransaction::BadProof
        );
        Ok(())
    }
}
