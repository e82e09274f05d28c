//! Helper module to build the genesis storage of the runtime.

use crate::{CONFIG, LOG_TARGET};
use hex_literal::hex;
use serde::{Deserialize, Serialize};
use sp_std::vec::Vec;
use weft_core::{
    storage::{self, Storage},
    system::{self, keys, EXTRINSIC_INDEX},
    types::{AccountId, Balance, Hash},
    version::LastRuntimeUpgradeInfo,
    Account, AccountData, AccountStore,
};

const ALICE_PUB_KEY_BYTES: [u8; 32] =
    hex!("d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d");
const BOB_PUB_KEY_BYTES: [u8; 32] =
    hex!("8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48");

/// The hash recorded for block zero. Block zero is never executed, so it has no computed
/// hash of its own.
pub const GENESIS_BLOCK_HASH: Hash = Hash::repeat_byte(69);

/// The initial state of the chain.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenesisConfig {
    /// Accounts that exist from the start, with their free balance.
    pub endowed_accounts: Vec<(AccountId, Balance)>,
}

impl Default for GenesisConfig {
    /// Alice and Bob, the well known development keys, each holding a round sum.
    fn default() -> Self {
        Self {
            endowed_accounts: vec![
                (ALICE_PUB_KEY_BYTES.into(), 1 << 60),
                (BOB_PUB_KEY_BYTES.into(), 1 << 60),
            ],
        }
    }
}

impl GenesisConfig {
    /// Writes all the genesis config stuff to storage.
    pub fn build<S: Storage>(&self, storage: &mut S) {
        log::info!(
            target: LOG_TARGET,
            "Building genesis storage with {} endowed accounts",
            self.endowed_accounts.len()
        );

        system::set_block_hash(storage, 0, GENESIS_BLOCK_HASH);
        storage::put(storage, &keys::parent_hash(), &GENESIS_BLOCK_HASH);
        storage::put(
            storage,
            &keys::last_runtime_upgrade(),
            &LastRuntimeUpgradeInfo::from(&CONFIG.version),
        );
        storage::put(storage, EXTRINSIC_INDEX, &0u32);

        for (who, free) in &self.endowed_accounts {
            let account = Account {
                providers: 1,
                data: AccountData {
                    free: *free,
                    ..Default::default()
                },
                ..Default::default()
            };
            AccountStore::set(storage, who, &account);
        }
    }

    /// The genesis state as raw key-value pairs, the way the host node stores it.
    pub fn build_storage(&self) -> sp_storage::Storage {
        let mut memory = weft_core::storage::MemoryStorage::new();
        self.build(&mut memory);

        sp_storage::Storage {
            top: memory
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            children_default: Default::default(),
        }
    }
}
