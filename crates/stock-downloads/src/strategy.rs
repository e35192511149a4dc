//! Storage strategy selection

use serde::{Deserialize, Serialize};

use crate::request::{SaveRequest, SaveResult};
use crate::Result;

/// First API level whose file-access model routes shared-storage writes
/// through the media registry.
pub const SCOPED_STORAGE_API_LEVEL: u32 = 29;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageCapability {
    /// Register an entry with the shared storage registry, then write it
    ManagedInsertion,
    /// Write straight into the public Downloads directory
    DirectPath,
}

impl StorageCapability {
    /// Pick the strategy for a platform. Hosts that report no API level
    /// allow direct filesystem access.
    pub fn probe(api_level: Option<u32>) -> Self {
        match api_level {
            Some(level) if level >= SCOPED_STORAGE_API_LEVEL => StorageCapability::ManagedInsertion,
            _ => StorageCapability::DirectPath,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageCapability::ManagedInsertion => "managed_insertion",
            StorageCapability::DirectPath => "direct_path",
        }
    }
}

pub trait StorageStrategy: Send + Sync {
    fn capability(&self) -> StorageCapability;

    /// Write the request's bytes as one file in the Downloads collection.
    fn save(&self, request: &SaveRequest<'_>) -> Result<SaveResult>;
}
