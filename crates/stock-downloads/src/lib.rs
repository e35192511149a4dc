//! Stock App Downloads
//!
//! Persists a byte buffer as a user-visible file in the public Downloads
//! collection. Two storage strategies exist:
//! - managed insertion through the shared storage registry
//! - direct writes into the Downloads directory
//!
//! The strategy is chosen once, from the platform capability probe, when the
//! [`DownloadSaver`] is built.

mod direct;
mod error;
mod managed;
mod mime;
mod registry;
mod request;
mod saver;
mod strategy;

pub use direct::DirectPath;
pub use error::{SaveError, INVALID_ARGUMENT, SAVE_ERROR};
pub use managed::{fallback_path, ManagedInsertion};
pub use mime::{content_type_for, OCTET_STREAM};
pub use registry::{
    EntryId, EntryWriter, MediaEntry, MediaRegistry, NewEntry, SharedStorageRegistry,
    DOWNLOADS_FOLDER_NAME,
};
pub use request::{SaveRequest, SaveResult, NULL_ARGUMENT_MESSAGE};
pub use saver::DownloadSaver;
pub use strategy::{StorageCapability, StorageStrategy, SCOPED_STORAGE_API_LEVEL};

pub type Result<T> = std::result::Result<T, SaveError>;
