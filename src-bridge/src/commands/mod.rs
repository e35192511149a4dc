//! Method channel commands
//!
//! These handlers bridge the application layer to the Rust core.

pub mod downloads;
