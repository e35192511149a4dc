//! Managed insertion through the shared storage registry

use std::io::Write;

use crate::error::SaveError;
use crate::registry::{EntryId, NewEntry, SharedStorageRegistry, DOWNLOADS_FOLDER_NAME};
use crate::request::{SaveRequest, SaveResult};
use crate::strategy::{StorageCapability, StorageStrategy};
use crate::Result;

/// Best-effort path reported when the registry cannot say where the entry
/// landed. It may not match the real on-disk location.
pub fn fallback_path(file_name: &str) -> String {
    format!("{DOWNLOADS_FOLDER_NAME}/{file_name}")
}

pub struct ManagedInsertion<R> {
    registry: R,
}

impl<R: SharedStorageRegistry> ManagedInsertion<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn write_entry(&self, id: &EntryId, bytes: &[u8]) -> Result<()> {
        let mut writer = self
            .registry
            .open_writer(id)?
            .ok_or_else(|| SaveError::WriterUnavailable(id.to_string()))?;

        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(())
    }
}

impl<R: SharedStorageRegistry> StorageStrategy for ManagedInsertion<R> {
    fn capability(&self) -> StorageCapability {
        StorageCapability::ManagedInsertion
    }

    fn save(&self, request: &SaveRequest<'_>) -> Result<SaveResult> {
        let entry = NewEntry {
            display_name: request.file_name(),
            mime_type: request.content_type(),
            relative_path: DOWNLOADS_FOLDER_NAME,
        };

        let id = self
            .registry
            .insert(&entry)?
            .ok_or(SaveError::CreateFailed)?;

        let written = self
            .write_entry(&id, request.bytes())
            .and_then(|()| self.registry.publish(&id, request.bytes().len() as u64));

        if let Err(err) = written {
            if let Err(cleanup) = self.registry.delete(&id) {
                tracing::warn!(
                    entry_id = %id,
                    error = %cleanup,
                    "Failed to remove incomplete media entry"
                );
            }
            return Err(err);
        }

        let path = match self.registry.resolve_path(&id) {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::warn!(entry_id = %id, "Media entry has no data path, using fallback");
                fallback_path(request.file_name())
            }
            Err(e) => {
                tracing::warn!(
                    entry_id = %id,
                    error = %e,
                    "Media entry lookup failed, using fallback"
                );
                fallback_path(request.file_name())
            }
        };

        tracing::info!(
            file_name = request.file_name(),
            mime_type = entry.mime_type,
            path = %path,
            "Saved file to Downloads"
        );

        Ok(SaveResult { path })
    }
}
