//! Runtime identity and the constants every component is configured with.
//!
//! A runtime builds one [`RuntimeConfig`] as a `const` and hands a reference to it to
//! whatever needs it. Nothing here is ever mutated at run time. The version itself is the
//! one the host reads, from `sp_version`.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_std::borrow::Cow;

use crate::types::BlockNumber;

pub use sp_version::{ApiId, RuntimeVersion};

/// Everything a runtime is parameterized with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub version: RuntimeVersion,
    /// How many recent block hashes are kept for mortality checks.
    pub block_hash_count: BlockNumber,
}

/// Which runtime last ran. Written at block initialization after an upgrade.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, TypeInfo)]
pub struct LastRuntimeUpgradeInfo {
    #[codec(compact)]
    pub spec_version: u32,
    pub spec_name: Cow<'static, str>,
}

impl From<&RuntimeVersion> for LastRuntimeUpgradeInfo {
    fn from(version: &RuntimeVersion) -> Self {
        Self {
            spec_version: version.spec_version,
            spec_name: version.spec_name.clone(),
        }
    }
}

impl LastRuntimeUpgradeInfo {
    /// Whether `version` is a different runtime than the one recorded here.
    pub fn was_upgraded(&self, version: &RuntimeVersion) -> bool {
        self.spec_version != version.spec_version || self.spec_name != version.spec_name
    }
}
