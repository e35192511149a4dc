//! Stock App Core
//!
//! Startup wiring: configuration, logging, and the one-time platform probe
//! that decides how files reach the Downloads collection.

mod app;
mod config;
mod error;

pub use app::App;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use stock_downloads::{
    content_type_for, DownloadSaver, SaveError, SaveRequest, SaveResult, StorageCapability,
    INVALID_ARGUMENT, NULL_ARGUMENT_MESSAGE, SAVE_ERROR,
};
pub use stock_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Output goes to stderr; stdout belongs to the bridge protocol.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
