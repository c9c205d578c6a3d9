//! Block and block header structures.

use crate::hash::{hash, Hash};
use crate::merkle::merkle_root;
use crate::pow::mine;
use crate::transaction::{Transaction, TransactionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// The fixed proof-of-work difficulty: the number of high bits shifted
/// off the all-ones target. Not adaptive.
pub const DIFFICULTY: u32 = 5;

/// Constant seed string the genesis Merkle root is derived from.
const GENESIS_SEED: &[u8] = b"ironchain";

/// Pinned genesis timestamp (ms since epoch). Fixing it makes every
/// independently constructed genesis block byte-identical, which the
/// chain's genesis-identity check relies on.
const GENESIS_TIMESTAMP: u64 = 1_704_067_200_000;

/// Sender of the genesis seed transaction.
pub const GENESIS_SENDER: &str = "Creator";
/// Receiver of the genesis seed transaction.
pub const GENESIS_RECEIVER: &str = "System";
/// Amount of the genesis seed transaction.
pub const GENESIS_AMOUNT: f64 = 100_000.0;

/// Errors that can occur while constructing a block.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("rejected transaction batch: {0}")]
    InvalidTransactions(#[from] TransactionError),
}

/// The header of a block containing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Zero-based position in the chain (0 for genesis).
    pub index: u64,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
    /// Hash of the previous block (zero for genesis).
    pub prev_hash: Hash,
    /// Hash of the full serialized block under the winning nonce.
    pub hash: Hash,
    /// Merkle root of the transaction batch.
    pub merkle_root: Hash,
    /// The nonce found by mining.
    pub nonce: u64,
    /// Proof-of-work difficulty this block was sealed at.
    pub difficulty: u32,
}

impl Header {
    /// Get the current Unix timestamp in milliseconds.
    pub fn current_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_millis() as u64
    }
}

/// Digest of a block: every header field except the stored hash, in fixed
/// order, followed by each transaction's canonical serialization in
/// sequence order. Reordering transactions changes the result.
pub fn block_digest(header: &Header, transactions: &[Transaction]) -> Hash {
    let mut preimage = Vec::new();
    preimage.extend_from_slice(&header.index.to_be_bytes());
    preimage.extend_from_slice(&header.timestamp.to_be_bytes());
    preimage.extend_from_slice(header.prev_hash.as_ref());
    preimage.extend_from_slice(header.merkle_root.as_ref());
    preimage.extend_from_slice(&header.nonce.to_be_bytes());
    preimage.extend_from_slice(&header.difficulty.to_be_bytes());
    for tx in transactions {
        preimage.extend_from_slice(&tx.canonical_bytes());
    }
    hash(&preimage)
}

/// A sealed unit of the ledger: header plus transaction batch.
///
/// Immutable after its hash is sealed. Any mutation of its fields
/// invalidates it; a changed block must be rebuilt, not patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block header.
    pub header: Header,
    /// Transactions committed by this block, in hash-significant order.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Build and seal a block over a transaction batch.
    ///
    /// Validates the batch, computes the Merkle root, then mines for the
    /// smallest nonce whose block hash falls below the difficulty target.
    /// Mining is an unbounded CPU-bound search; it blocks until a nonce
    /// is found.
    pub fn build(
        index: u64,
        prev_hash: Hash,
        transactions: Vec<Transaction>,
        difficulty: u32,
    ) -> Result<Self, BlockError> {
        Transaction::validate_batch(&transactions)?;

        let mut header = Header {
            index,
            timestamp: Header::current_timestamp(),
            prev_hash,
            hash: Hash::ZERO,
            merkle_root: merkle_root(&transactions),
            nonce: 0,
            difficulty,
        };

        let (nonce, hash) = mine(&header, &transactions);
        header.nonce = nonce;
        header.hash = hash;

        tracing::debug!(index, nonce, hash = %hash, "sealed block");

        Ok(Self {
            header,
            transactions,
        })
    }

    /// The canonical genesis block.
    ///
    /// Fully deterministic: pinned timestamp, zero previous hash, a single
    /// seed transaction, and a Merkle root derived from a constant seed
    /// string rather than from the seed transaction. Hashed like any other
    /// block but not mined (nonce stays 0).
    pub fn genesis() -> Self {
        let seed = Transaction::new(GENESIS_SENDER, GENESIS_RECEIVER, GENESIS_AMOUNT);
        let mut header = Header {
            index: 0,
            timestamp: GENESIS_TIMESTAMP,
            prev_hash: Hash::ZERO,
            hash: Hash::ZERO,
            merkle_root: hash(GENESIS_SEED),
            nonce: 0,
            difficulty: DIFFICULTY,
        };
        let transactions = vec![seed];
        header.hash = block_digest(&header, &transactions);

        Self {
            header,
            transactions,
        }
    }

    /// Recompute this block's hash from its current contents.
    pub fn compute_hash(&self) -> Hash {
        block_digest(&self.header, &self.transactions)
    }

    /// Check the stored hash against a recomputation.
    pub fn verify_hash(&self) -> bool {
        self.header.hash == self.compute_hash()
    }

    /// Check the stored Merkle root against a recomputation.
    pub fn verify_merkle_root(&self) -> bool {
        self.header.merkle_root == merkle_root(&self.transactions)
    }

    /// Get the block hash.
    pub fn hash(&self) -> Hash {
        self.header.hash
    }

    /// Get the zero-based chain position.
    pub fn index(&self) -> u64 {
        self.header.index
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.header.index == 0 && self.header.prev_hash == Hash::ZERO
    }

    /// Get the number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block {}:", self.header.index)?;
        writeln!(f, "  Timestamp: {}", self.header.timestamp)?;
        writeln!(f, "  Previous Hash: {}", self.header.prev_hash)?;
        writeln!(f, "  Hash: {}", self.header.hash)?;
        writeln!(f, "  Merkle Root: {}", self.header.merkle_root)?;
        writeln!(f, "  Difficulty: {}", self.header.difficulty)?;
        writeln!(f, "  Nonce: {}", self.header.nonce)?;
        writeln!(f, "  Transactions:")?;
        for tx in &self.transactions {
            writeln!(f, "    {}", tx)?;
        }
        Ok(())
    }
}
