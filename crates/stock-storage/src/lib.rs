//! Stock App Storage Layer
//!
//! SQLite index of files published to shared storage. Plays the role the
//! platform media registry plays on devices with mediated storage access.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
