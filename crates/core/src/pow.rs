//! Proof-of-work nonce search.
//!
//! A block hash, read as a big-endian 256-bit integer, must fall strictly
//! below the target `(2^256 - 1) >> difficulty`. Mining iterates nonces
//! from zero and accepts the first that satisfies the target, so the
//! discovered nonce is always the smallest satisfying one.

use crate::block::{block_digest, Header};
use crate::hash::Hash;
use crate::transaction::Transaction;

/// The target `(2^256 - 1) >> difficulty` as big-endian bytes:
/// `difficulty` leading zero bits, then all ones.
pub fn target(difficulty: u32) -> [u8; 32] {
    debug_assert!(difficulty < 256, "target would be zero and unreachable");
    let mut bytes = [0xFFu8; 32];
    let zero_bytes = (difficulty / 8) as usize;
    let zero_bits = difficulty % 8;
    for byte in bytes.iter_mut().take(zero_bytes) {
        *byte = 0;
    }
    if zero_bytes < 32 {
        bytes[zero_bytes] = 0xFF >> zero_bits;
    }
    bytes
}

/// Whether a hash satisfies the difficulty target.
///
/// Byte-wise lexicographic comparison of big-endian bytes is exactly
/// integer comparison.
pub fn meets_target(hash: &Hash, difficulty: u32) -> bool {
    hash.as_bytes() < &target(difficulty)
}

/// Search for the smallest nonce sealing the given header over the given
/// transactions. Pure function of (header fields minus nonce, batch).
///
/// This is an unbounded, CPU-bound, blocking loop: there is no iteration
/// cap and no cancellation hook. Callers needing cancellation must wrap
/// the search on a dedicated worker.
pub fn mine(header: &Header, transactions: &[Transaction]) -> (u64, Hash) {
    let mut candidate = header.clone();
    let mut nonce: u64 = 0;
    loop {
        candidate.nonce = nonce;
        let hash = block_digest(&candidate, transactions);
        if meets_target(&hash, candidate.difficulty) {
            tracing::trace!(nonce, hash = %hash, "nonce satisfies target");
            return (nonce, hash);
        }
        nonce += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash;

    fn fixed_header() -> Header {
        Header {
            index: 1,
            timestamp: 1_704_067_200_000,
            prev_hash: hash(b"previous"),
            hash: Hash::ZERO,
            merkle_root: hash(b"root"),
            nonce: 0,
            difficulty: 5,
        }
    }

    #[test]
    fn test_target_difficulty_zero_is_all_ones() {
        assert_eq!(target(0), [0xFF; 32]);
    }

    #[test]
    fn test_target_shifts_whole_and_partial_bytes() {
        let t = target(5);
        assert_eq!(t[0], 0b0000_0111);
        assert!(t[1..].iter().all(|&b| b == 0xFF));

        let t = target(12);
        assert_eq!(t[0], 0);
        assert_eq!(t[1], 0x0F);
        assert!(t[2..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_meets_target_boundaries() {
        // Just below the difficulty-5 target
        let mut below = [0u8; 32];
        below[0] = 0b0000_0111;
        below[31] = 0xFE;
        assert!(meets_target(&Hash::from_bytes(below), 5));

        // Equal to the target: strictly-less fails
        assert!(!meets_target(&Hash::from_bytes(target(5)), 5));

        // Above: a high bit set within the shifted-off range
        let mut above = [0u8; 32];
        above[0] = 0b0000_1000;
        assert!(!meets_target(&Hash::from_bytes(above), 5));
    }

    #[test]
    fn test_mine_finds_satisfying_nonce() {
        let header = fixed_header();
        let txs = vec![Transaction::new("alice", "bob", 1.0)];

        let (nonce, sealed) = mine(&header, &txs);
        assert!(meets_target(&sealed, header.difficulty));

        let mut check = header.clone();
        check.nonce = nonce;
        assert_eq!(block_digest(&check, &txs), sealed);
    }

    #[test]
    fn test_mine_deterministic() {
        let header = fixed_header();
        let txs = vec![Transaction::new("alice", "bob", 1.0)];

        assert_eq!(mine(&header, &txs), mine(&header, &txs));
    }

    #[test]
    fn test_mined_nonce_is_smallest() {
        let header = fixed_header();
        let txs = vec![Transaction::new("carol", "dave", 2.0)];

        let (nonce, _) = mine(&header, &txs);
        let mut candidate = header.clone();
        for earlier in 0..nonce {
            candidate.nonce = earlier;
            assert!(!meets_target(
                &block_digest(&candidate, &txs),
                header.difficulty
            ));
        }
    }
}
