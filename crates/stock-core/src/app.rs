//! Application container

use stock_downloads::{DownloadSaver, StorageCapability};
use stock_storage::Database;

use crate::config::Config;
use crate::Result;

/// Built once at startup. The storage strategy is fixed for the lifetime of
/// the process.
pub struct App {
    saver: DownloadSaver,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let capability = StorageCapability::probe(config.api_level);

        let saver = match capability {
            StorageCapability::ManagedInsertion => {
                let db = Database::open(&config.registry_path)?;
                DownloadSaver::managed(db, config.external_storage_root.clone())
            }
            StorageCapability::DirectPath => DownloadSaver::direct(config.downloads_dir.clone()),
        };

        tracing::info!(
            strategy = capability.as_str(),
            api_level = ?config.api_level,
            "Download saver ready"
        );

        Ok(Self { saver })
    }

    pub fn saver(&self) -> &DownloadSaver {
        &self.saver
    }
}
