//! Bridge state

use stock_core::{App, Config, DownloadSaver, Result};

/// Shared by every call on the channel. Thread-safe without locking.
pub struct BridgeState {
    app: App,
}

impl BridgeState {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            app: App::new(config)?,
        })
    }

    pub fn saver(&self) -> &DownloadSaver {
        self.app.saver()
    }
}
