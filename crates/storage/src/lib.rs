//! Persistent block storage for ironchain.
//!
//! Blocks are bincode-encoded into sled, keyed by chain position, with a
//! separate latest-block record updated on every save. The core ledger
//! consumes this only through the narrow [`BlockStore`] capability.

pub mod db;
pub mod store;

// Re-export commonly used types
pub use db::{Result, Storage, StorageError};
pub use store::{BlockStore, SledBlockStore};
