//! The block persistence capability and its sled implementation.

use crate::db::{Result, Storage};
use ironchain_core::Block;
use std::path::Path;

/// Key under which the most recently saved block is recorded.
const LATEST_BLOCK_KEY: &[u8] = b"latest_block";

/// Durable storage for blocks, keyed by chain position.
///
/// Consumed by callers after a successful in-memory append; the chain
/// itself performs no I/O. Saving is not transactionally coupled to the
/// in-memory chain: a failure here leaves the chain as appended.
pub trait BlockStore {
    /// Persist a block under its index and update the latest-block record.
    fn save_block(&self, block: &Block) -> Result<()>;

    /// Fetch a previously saved block by chain position.
    fn get_block(&self, index: u64) -> Result<Option<Block>>;

    /// Fetch the most recently saved block.
    fn get_latest_block(&self) -> Result<Option<Block>>;

    /// Flush and release underlying resources. Safe to call once at
    /// shutdown.
    fn close(&self) -> Result<()>;
}

/// sled-backed [`BlockStore`].
pub struct SledBlockStore {
    storage: Storage,
}

impl SledBlockStore {
    /// Open a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::open(path)?;
        Ok(Self { storage })
    }

    /// Open an in-memory store (for testing).
    pub fn open_temporary() -> Result<Self> {
        let storage = Storage::open_temporary()?;
        Ok(Self { storage })
    }
}

impl BlockStore for SledBlockStore {
    fn save_block(&self, block: &Block) -> Result<()> {
        self.storage.put(Storage::block_key(block.index()), block)?;
        self.storage.put(LATEST_BLOCK_KEY, block)?;
        tracing::debug!(index = block.index(), hash = %block.hash(), "saved block");
        Ok(())
    }

    fn get_block(&self, index: u64) -> Result<Option<Block>> {
        self.storage.get(Storage::block_key(index))
    }

    fn get_latest_block(&self) -> Result<Option<Block>> {
        self.storage.get(LATEST_BLOCK_KEY)
    }

    fn close(&self) -> Result<()> {
        self.storage.flush()
    }
}
