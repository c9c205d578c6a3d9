//! The append-only chain: ordered blocks from genesis, with full-chain
//! validation by recomputation.

use ironchain_core::{Block, BlockError, Hash, Transaction, TransactionError, DIFFICULTY};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("rejected transaction batch: {0}")]
    InvalidTransactions(#[from] TransactionError),

    #[error("chain link mismatch: expected index {expected}, got {got}")]
    LinkIndex { expected: u64, got: u64 },

    #[error("chain link mismatch: expected previous hash {expected}, got {got}")]
    LinkPrevHash { expected: Hash, got: Hash },

    #[error("genesis block does not match the canonical genesis")]
    GenesisMismatch,

    #[error("chain validation failed:\n{0}")]
    Validation(String),
}

impl From<BlockError> for ChainError {
    fn from(err: BlockError) -> Self {
        match err {
            BlockError::InvalidTransactions(e) => ChainError::InvalidTransactions(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// An ordered, append-only sequence of blocks.
///
/// Never empty: every chain starts from the canonical genesis block at
/// index 0. Grows only through [`Chain::append`]; blocks are never
/// truncated or reordered. Single writer: callers must serialize append
/// calls against a given chain themselves.
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create a chain holding the canonical genesis block.
    ///
    /// Genesis is constructed explicitly here rather than through any
    /// process-wide singleton; every chain gets a byte-identical copy.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// A chain is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The most recently appended block.
    pub fn tip(&self) -> &Block {
        self.blocks.last().expect("chain always contains genesis")
    }

    /// Get a block by chain position.
    pub fn get(&self, index: u64) -> Option<&Block> {
        self.blocks.get(index as usize)
    }

    /// Validate, build, mine, and append a block over the given batch.
    ///
    /// The new block lands at the current length with the tip's hash as
    /// its previous hash. Link continuity is re-checked against the tip
    /// before the chain is mutated; on any error the chain is left
    /// unmodified. Blocks until mining completes.
    pub fn append(&mut self, transactions: Vec<Transaction>) -> Result<&Block> {
        let next_index = self.blocks.len() as u64;
        let prev_hash = self.tip().hash();

        let block = Block::build(next_index, prev_hash, transactions, DIFFICULTY)?;
        self.append_block(block)?;

        Ok(self.tip())
    }

    /// Append an already-sealed block after checking link continuity.
    ///
    /// The block's index must be exactly one past the tip's and its
    /// previous hash must equal the tip's hash; otherwise the append is
    /// rejected and the chain is unmodified.
    pub fn append_block(&mut self, block: Block) -> Result<()> {
        let tip = self.tip();

        if block.index() != tip.index() + 1 {
            return Err(ChainError::LinkIndex {
                expected: tip.index() + 1,
                got: block.index(),
            });
        }
        if block.header.prev_hash != tip.hash() {
            return Err(ChainError::LinkPrevHash {
                expected: tip.hash(),
                got: block.header.prev_hash,
            });
        }

        tracing::info!(
            index = block.index(),
            hash = %block.hash(),
            tx_count = block.tx_count(),
            "appended block"
        );
        self.blocks.push(block);
        Ok(())
    }

    /// Validate the whole chain by recomputation.
    ///
    /// Walks every block once, accumulating all discrepancies — stored
    /// hash vs. recomputed hash, index gaps, previous-hash mismatches —
    /// into one multi-line report. The one exception is the genesis
    /// check: the first block must be structurally identical to the
    /// canonical genesis, and any difference there returns immediately.
    pub fn validate(&self) -> Result<()> {
        let mut report = String::new();

        for (i, block) in self.blocks.iter().enumerate() {
            if i == 0 {
                if *block != Block::genesis() {
                    return Err(ChainError::GenesisMismatch);
                }
                continue;
            }

            if !block.verify_hash() {
                report.push_str(&format!(
                    "block {}: stored hash {} does not match recomputed hash {}\n",
                    block.index(),
                    block.hash(),
                    block.compute_hash()
                ));
            }

            let prev = &self.blocks[i - 1];
            if block.index() != prev.index() + 1 {
                report.push_str(&format!(
                    "block {}: index is not sequential, expected {}, got {}\n",
                    i,
                    prev.index() + 1,
                    block.index()
                ));
            }
            if block.header.prev_hash != prev.hash() {
                report.push_str(&format!(
                    "block {}: previous hash does not match, expected {}, got {}\n",
                    i,
                    prev.hash(),
                    block.header.prev_hash
                ));
            }
        }

        if report.is_empty() {
            Ok(())
        } else {
            Err(ChainError::Validation(report.trim_end().to_string()))
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Blockchain:")?;
        for block in &self.blocks {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}
