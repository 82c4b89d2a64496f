//! Transaction-related types for the banking ledger
//!
//! A transaction record documents exactly one balance mutation. Records are
//! created atomically with (but logically after) the mutation they document,
//! are immutable afterwards, and are never deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;

/// Transaction identifier, generated at creation.
pub type TransactionId = Uuid;

/// Balance-affecting event types
///
/// Direction is encoded by the type, never by the sign of the amount:
/// `Deposit` and `TransferIn` credit the account, `Withdrawal` and
/// `TransferOut` debit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    TransferIn,
    TransferOut,
}

impl TransactionType {
    /// Whether money leaves the account. Spending analytics only consider
    /// outgoing types.
    pub fn is_outgoing(&self) -> bool {
        matches!(self, TransactionType::Withdrawal | TransactionType::TransferOut)
    }

    /// Whether the record is one leg of a two-account transfer.
    pub fn is_transfer(&self) -> bool {
        matches!(self, TransactionType::TransferIn | TransactionType::TransferOut)
    }
}

/// Transaction settlement status
///
/// `Completed` is the only state today; pending and reversed states are a
/// known gap, so the enum keeps the slot open without the ledger acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
}

/// A single append-only ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,

    /// Owning account
    pub account_id: AccountId,

    pub transaction_type: TransactionType,

    /// Always strictly positive; see [`TransactionType`] for direction
    pub amount: Decimal,

    pub description: String,

    /// Counterpart account, set exactly for `TransferIn`/`TransferOut`
    pub related_account_id: Option<AccountId>,

    /// Creation instant; the sort key for history queries
    pub timestamp: DateTime<Utc>,

    pub status: TransactionStatus,
}

impl TransactionRecord {
    /// Create a completed record stamped with the current instant.
    pub fn new(
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: Decimal,
        description: &str,
    ) -> Self {
        TransactionRecord {
            transaction_id: Uuid::new_v4(),
            account_id,
            transaction_type,
            amount,
            description: description.to_string(),
            related_account_id: None,
            timestamp: Utc::now(),
            status: TransactionStatus::Completed,
        }
    }

    /// Attach the counterpart account of a transfer leg.
    pub fn with_related(mut self, related_account_id: AccountId) -> Self {
        self.related_account_id = Some(related_account_id);
        self
    }

    /// Override the creation instant (history backfill and tests).
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_completed_without_counterpart() {
        let account_id = Uuid::new_v4();
        let record = TransactionRecord::new(
            account_id,
            TransactionType::Deposit,
            Decimal::new(12_345, 2),
            "Payroll",
        );

        assert_eq!(record.account_id, account_id);
        assert_eq!(record.transaction_type, TransactionType::Deposit);
        assert_eq!(record.amount, Decimal::new(12_345, 2));
        assert_eq!(record.status, TransactionStatus::Completed);
        assert!(record.related_account_id.is_none());
    }

    #[test]
    fn test_with_related_sets_counterpart() {
        let other = Uuid::new_v4();
        let record = TransactionRecord::new(
            Uuid::new_v4(),
            TransactionType::TransferOut,
            Decimal::ONE,
            "Rent",
        )
        .with_related(other);

        assert_eq!(record.related_account_id, Some(other));
    }

    #[test]
    fn test_outgoing_classification() {
        assert!(TransactionType::Withdrawal.is_outgoing());
        assert!(TransactionType::TransferOut.is_outgoing());
        assert!(!TransactionType::Deposit.is_outgoing());
        assert!(!TransactionType::TransferIn.is_outgoing());
    }
}
