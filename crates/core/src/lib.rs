//! Core ledger primitives for ironchain.
//!
//! This crate provides the fundamental types used throughout the ledger:
//! - SHA-256 hashing
//! - Transactions and batch validation
//! - Merkle tree commitments
//! - Blocks and block headers
//! - Proof-of-work sealing

pub mod block;
pub mod hash;
pub mod merkle;
pub mod pow;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use block::{block_digest, Block, BlockError, Header, DIFFICULTY};
pub use hash::{hash, hash_concat, Hash, H256};
pub use merkle::{merkle_root, MerkleNode, MerkleTree};
pub use pow::{meets_target, mine, target};
pub use transaction::{Transaction, TransactionError};
