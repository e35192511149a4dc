//! Bridge configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use stock_downloads::DOWNLOADS_FOLDER_NAME;

use crate::error::CoreError;
use crate::Result;

pub const ENV_EXTERNAL_STORAGE: &str = "STOCK_EXTERNAL_STORAGE";
pub const ENV_DOWNLOADS_DIR: &str = "STOCK_DOWNLOADS_DIR";
pub const ENV_REGISTRY_PATH: &str = "STOCK_REGISTRY_PATH";
pub const ENV_API_LEVEL: &str = "STOCK_PLATFORM_API_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the shared storage volume; managed entries live below it
    pub external_storage_root: PathBuf,
    /// Public Downloads directory used for direct writes
    pub downloads_dir: PathBuf,
    /// Path to the shared storage registry database
    pub registry_path: PathBuf,
    /// Platform API level, `None` on hosts without mediated storage
    #[serde(default)]
    pub api_level: Option<u32>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let downloads_dir =
            dirs::download_dir().unwrap_or_else(|| data_dir.join(DOWNLOADS_FOLDER_NAME));
        let external_storage_root = downloads_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.clone());

        Self {
            external_storage_root,
            downloads_dir,
            registry_path: data_dir.join("media.db"),
            api_level: None,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("stock-app"))
            .unwrap_or_else(|| PathBuf::from(".stock-app"))
    }

    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load a JSON config file, then apply process environment overrides.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Setting only the storage root moves
    /// the Downloads directory along with it.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = value(ENV_EXTERNAL_STORAGE) {
            self.external_storage_root = PathBuf::from(root);
            self.downloads_dir = self.external_storage_root.join(DOWNLOADS_FOLDER_NAME);
        }
        if let Some(dir) = value(ENV_DOWNLOADS_DIR) {
            self.downloads_dir = PathBuf::from(dir);
        }
        if let Some(path) = value(ENV_REGISTRY_PATH) {
            self.registry_path = PathBuf::from(path);
        }
        if let Some(level) = value(ENV_API_LEVEL) {
            let level = level.trim().parse::<u32>().map_err(|_| {
                CoreError::Config(format!("{ENV_API_LEVEL} is not an API level: {level}"))
            })?;
            self.api_level = Some(level);
        }

        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
