//! Merkle tree commitment over transaction batches.

use crate::hash::{hash, hash_concat, Hash};
use crate::transaction::Transaction;

/// One node of the transient Merkle tree.
///
/// Leaves own no children and carry the digest of a transaction's
/// canonical serialization; interior nodes own both children and carry
/// `hash(left.hash ++ right.hash)`.
#[derive(Debug)]
pub struct MerkleNode {
    pub hash: Hash,
    pub left: Option<Box<MerkleNode>>,
    pub right: Option<Box<MerkleNode>>,
}

impl MerkleNode {
    fn leaf(hash: Hash) -> Self {
        Self {
            hash,
            left: None,
            right: None,
        }
    }

    fn parent(left: MerkleNode, right: MerkleNode) -> Self {
        let combined = hash_concat(&[left.hash.as_ref(), right.hash.as_ref()]);
        Self {
            hash: combined,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }
}

/// A binary hash tree over a batch of transactions.
///
/// The tree is transient: build it, extract the root, discard it. Blocks
/// retain only the root hash.
#[derive(Debug)]
pub struct MerkleTree {
    root: MerkleNode,
}

impl MerkleTree {
    /// Build the tree bottom-up from a non-empty batch.
    ///
    /// Each leaf holds the digest of one transaction's canonical bytes.
    /// Levels fold pairwise; an odd level pairs its trailing node with a
    /// duplicate of itself rather than promoting it unpaired. Returns
    /// `None` for an empty batch, which has no well-defined root.
    pub fn new(transactions: &[Transaction]) -> Option<Self> {
        if transactions.is_empty() {
            return None;
        }

        let mut level: Vec<MerkleNode> = transactions
            .iter()
            .map(|tx| MerkleNode::leaf(hash(&tx.canonical_bytes())))
            .collect();

        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut nodes = level.into_iter();

            while let Some(left) = nodes.next() {
                match nodes.next() {
                    Some(right) => next.push(MerkleNode::parent(left, right)),
                    None => {
                        // Odd count: the last node pairs with itself
                        let twin = MerkleNode::leaf(left.hash);
                        next.push(MerkleNode::parent(left, twin));
                    }
                }
            }

            level = next;
        }

        let root = level.pop().expect("non-empty batch yields a root");
        Some(Self { root })
    }

    /// The root hash committing to the whole batch.
    pub fn root(&self) -> Hash {
        self.root.hash
    }
}

/// Compute the Merkle root of a transaction batch.
///
/// An empty batch has no tree; it maps to the `Hash::ZERO` sentinel.
pub fn merkle_root(transactions: &[Transaction]) -> Hash {
    match MerkleTree::new(transactions) {
        Some(tree) => tree.root(),
        None => Hash::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_txs(n: usize) -> Vec<Transaction> {
        (0..n)
            .map(|i| Transaction::new(format!("sender{}", i), format!("receiver{}", i), i as f64))
            .collect()
    }

    #[test]
    fn test_empty_batch_sentinel() {
        assert_eq!(merkle_root(&[]), Hash::ZERO);
        assert!(MerkleTree::new(&[]).is_none());
    }

    #[test]
    fn test_single_transaction_root_is_leaf_hash() {
        let txs = make_txs(1);
        let root = merkle_root(&txs);
        assert_eq!(root, hash(&txs[0].canonical_bytes()));
    }

    #[test]
    fn test_two_transactions() {
        let txs = make_txs(2);
        let leaf0 = hash(&txs[0].canonical_bytes());
        let leaf1 = hash(&txs[1].canonical_bytes());
        let expected = hash_concat(&[leaf0.as_ref(), leaf1.as_ref()]);
        assert_eq!(merkle_root(&txs), expected);
    }

    #[test]
    fn test_odd_batch_duplicates_trailing_leaf() {
        let txs = make_txs(3);
        let leaf0 = hash(&txs[0].canonical_bytes());
        let leaf1 = hash(&txs[1].canonical_bytes());
        let leaf2 = hash(&txs[2].canonical_bytes());

        let pair = hash_concat(&[leaf0.as_ref(), leaf1.as_ref()]);
        let twin = hash_concat(&[leaf2.as_ref(), leaf2.as_ref()]);
        let expected = hash_concat(&[pair.as_ref(), twin.as_ref()]);

        assert_eq!(merkle_root(&txs), expected);
    }

    #[test]
    fn test_root_deterministic() {
        let txs = make_txs(10);
        assert_eq!(merkle_root(&txs), merkle_root(&txs));
    }

    #[test]
    fn test_order_matters() {
        let txs = make_txs(4);
        let mut reversed = txs.clone();
        reversed.reverse();
        assert_ne!(merkle_root(&txs), merkle_root(&reversed));
    }

    #[test]
    fn test_interior_nodes_own_children() {
        let txs = make_txs(2);
        let tree = MerkleTree::new(&txs).unwrap();
        assert!(tree.root.left.is_some());
        assert!(tree.root.right.is_some());
        assert!(tree.root.left.as_ref().unwrap().left.is_none());
    }
}
