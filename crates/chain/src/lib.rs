//! Append-only chain for ironchain.
//!
//! Owns the in-memory block sequence: genesis construction, batch append
//! with proof-of-work sealing, and whole-chain validation by
//! recomputation. Persistence is a separate collaborator; see the
//! `ironchain-storage` crate.

pub mod chain;

// Re-export commonly used types
pub use chain::{Chain, ChainError};
