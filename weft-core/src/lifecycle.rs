//! Opening and closing blocks.
//!
//! The host drives every block through the same sequence: [`initialize_block`] once, then
//! one [`note_applied_extrinsic`] per included extrinsic, then [`finalize_block`]. These
//! functions keep the `System` bookkeeping consistent across that sequence and refuse
//! to run out of order.

use crate::{
    ensure,
    storage::{self, Storage},
    system::{self, keys, Phase, EXTRINSIC_INDEX},
    types::{pre_runtime_only, BlockNumber, Header},
    validity::TransactionValidityError,
    version::{LastRuntimeUpgradeInfo, RuntimeConfig},
    LOG_TARGET,
};
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_runtime::traits::Header as _;
use sp_std::vec::Vec;

/// A broken host/runtime contract. The current call must be aborted.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, TypeInfo)]
pub enum LifecycleError {
    /// A block was opened while another one was still open.
    AlreadyInitialized,
    /// A block operation ran with no block open.
    NotInitialized,
    /// Block zero is built from the genesis config, never executed.
    GenesisNotExecutable,
    /// A block being imported contains an extrinsic that does not apply.
    InvalidExtrinsic(TransactionValidityError),
    /// A block being imported claims a state root that execution did not reproduce.
    StateRootMismatch,
    /// A block being imported claims an extrinsics root that does not match its body.
    ExtrinsicsRootMismatch,
}

/// Open the block described by `header`.
pub fn initialize_block<S: Storage>(
    config: &RuntimeConfig,
    storage: &mut S,
    header: &Header,
) -> Result<(), LifecycleError> {
    ensure!(
        system::execution_phase(storage).is_none(),
        LifecycleError::AlreadyInitialized
    );
    ensure!(header.number != 0, LifecycleError::GenesisNotExecutable);

    log::info!(
        target: LOG_TARGET,
        "Entering initialize_block. header: {:?}",
        header
    );

    let upgraded = system::last_runtime_upgrade(storage)
        .map_or(true, |last| last.was_upgraded(&config.version));
    if upgraded {
        log::info!(
            target: LOG_TARGET,
            "Runtime {} v{} runs for the first time",
            config.version.spec_name,
            config.version.spec_version
        );
        storage::put(
            storage,
            &keys::last_runtime_upgrade(),
            &LastRuntimeUpgradeInfo::from(&config.version),
        );
    }

    storage::put(storage, &keys::execution_phase(), &Phase::ApplyExtrinsic(0));
    storage::put(storage, EXTRINSIC_INDEX, &0u32);
    storage::put(storage, &keys::number(), &header.number);
    storage::put(storage, &keys::digest(), &pre_runtime_only(&header.digest));
    storage::put(storage, &keys::parent_hash(), &header.parent_hash);
    system::set_block_hash(storage, header.number - 1, header.parent_hash);

    Ok(())
}

/// Record that the extrinsic `encoded` was included in the open block, and move on to the
/// next index. Returns the index the extrinsic was recorded at.
pub fn note_applied_extrinsic<S: Storage>(
    storage: &mut S,
    encoded: &[u8],
) -> Result<u32, LifecycleError> {
    ensure!(
        matches!(
            system::execution_phase(storage),
            Some(Phase::ApplyExtrinsic(_))
        ),
        LifecycleError::NotInitialized
    );
    let index = system::extrinsic_index(storage).ok_or(LifecycleError::NotInitialized)?;

    storage::put(storage, &keys::extrinsic_data(index), encoded);
    storage::put(storage, EXTRINSIC_INDEX, &(index + 1));
    storage::put(
        storage,
        &keys::execution_phase(),
        &Phase::ApplyExtrinsic(index + 1),
    );

    log::debug!(target: LOG_TARGET, "Noted extrinsic {}", index);
    Ok(index)
}

/// Close the open block and return its header. The header carries everything except the
/// seal.
pub fn finalize_block<S: Storage>(
    config: &RuntimeConfig,
    storage: &mut S,
) -> Result<Header, LifecycleError> {
    ensure!(
        system::execution_phase(storage).is_some(),
        LifecycleError::NotInitialized
    );
    storage::put(storage, &keys::execution_phase(), &Phase::Finalization);

    let count: u32 = storage::take(storage, EXTRINSIC_INDEX).unwrap_or_default();

    let extrinsics: Vec<Vec<u8>> = (0..count)
        .map(|index| storage::take(storage, &keys::extrinsic_data(index)).unwrap_or_default())
        .collect();
    let state_version = config.version.state_version();
    let extrinsics_root = sp_io::trie::blake2_256_ordered_root(extrinsics, state_version);

    let number = system::block_number(storage);
    let stale = stale_block_hash(number, config.block_hash_count);
    if stale != 0 {
        storage.clear(&keys::block_hash(stale));
    }

    storage.clear(&keys::execution_phase());

    let header = Header::new(
        number,
        extrinsics_root,
        storage.root(state_version),
        system::parent_hash(storage),
        system::digest(storage),
    );

    log::info!(
        target: LOG_TARGET,
        "Finalized block {} with {} extrinsics. header: {:?}",
        number,
        count,
        header
    );

    Ok(header)
}

/// The block whose hash falls out of the kept window once `number` is finalized. The
/// genesis hash is never pruned, so zero means nothing to remove.
fn stale_block_hash(number: BlockNumber, block_hash_count: BlockNumber) -> BlockNumber {
    number.saturating_sub(block_hash_count).saturating_sub(1)
}
