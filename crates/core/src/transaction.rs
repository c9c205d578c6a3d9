//! Transaction type, canonical serialization, and batch validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during transaction validation.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// One or more transactions in a batch failed validation.
    /// The report lists every violation found, one per line.
    #[error("invalid transactions:\n{0}")]
    Invalid(String),
}

/// A value transfer recorded on the ledger.
///
/// Immutable once constructed; blocks commit to the exact field values
/// through the canonical serialization below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's identifier.
    pub sender: String,
    /// Receiver's identifier.
    pub receiver: String,
    /// Amount transferred.
    pub amount: f64,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }

    /// Canonical byte serialization: sender, receiver, then the amount's
    /// IEEE-754 bit pattern big-endian. Fixed field order; used only as
    /// hash input, never as a storage format.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(self.sender.len() + self.receiver.len() + 8);
        bytes.extend_from_slice(self.sender.as_bytes());
        bytes.extend_from_slice(self.receiver.as_bytes());
        bytes.extend_from_slice(&self.amount.to_bits().to_be_bytes());
        bytes
    }

    /// Validate a whole batch, accumulating every violation found.
    ///
    /// Does not stop at the first failure: the returned error carries a
    /// multi-line report covering all offending transactions. An empty
    /// batch is permitted.
    pub fn validate_batch(transactions: &[Transaction]) -> Result<(), TransactionError> {
        let mut report = String::new();
        for (i, tx) in transactions.iter().enumerate() {
            if tx.sender.is_empty() {
                report.push_str(&format!("transaction {}: sender is empty\n", i));
            }
            if tx.receiver.is_empty() {
                report.push_str(&format!("transaction {}: receiver is empty\n", i));
            }
            if tx.amount < 0.0 {
                report.push_str(&format!(
                    "transaction {}: amount {} is negative\n",
                    i, tx.amount
                ));
            }
        }
        if report.is_empty() {
            Ok(())
        } else {
            Err(TransactionError::Invalid(report.trim_end().to_string()))
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {:.2}", self.sender, self.receiver, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_batch() {
        let txs = vec![
            Transaction::new("alice", "bob", 10.0),
            Transaction::new("bob", "carol", 0.0),
        ];
        assert!(Transaction::validate_batch(&txs).is_ok());
    }

    #[test]
    fn test_empty_batch_permitted() {
        assert!(Transaction::validate_batch(&[]).is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let txs = vec![Transaction::new("A", "B", -5.0)];
        let err = Transaction::validate_batch(&txs).unwrap_err();
        let TransactionError::Invalid(report) = err;
        assert!(report.contains("negative"));
    }

    #[test]
    fn test_violations_accumulate_across_batch() {
        let txs = vec![
            Transaction::new("", "bob", 10.0),
            Transaction::new("alice", "", -1.0),
        ];
        let TransactionError::Invalid(report) =
            Transaction::validate_batch(&txs).unwrap_err();

        // All three violations reported, not just the first
        assert!(report.contains("transaction 0: sender is empty"));
        assert!(report.contains("transaction 1: receiver is empty"));
        assert!(report.contains("transaction 1: amount -1 is negative"));
        assert_eq!(report.lines().count(), 3);
    }

    #[test]
    fn test_canonical_bytes_deterministic() {
        let tx = Transaction::new("alice", "bob", 12.5);
        assert_eq!(tx.canonical_bytes(), tx.canonical_bytes());
    }

    #[test]
    fn test_canonical_bytes_field_order() {
        // Swapping sender and receiver must change the serialization
        let a = Transaction::new("alice", "bob", 1.0);
        let b = Transaction::new("bob", "alice", 1.0);
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
    }

    #[test]
    fn test_display_two_decimals() {
        let tx = Transaction::new("Bharat", "Raul", 10.0);
        assert_eq!(tx.to_string(), "Bharat -> Raul: 10.00");
    }
}
