//! In-memory transaction log
//!
//! Append-only storage of transaction records, indexed by account and by
//! transaction id. Entries are cloned out on every read; nothing hands a
//! caller a handle it could mutate the log through.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::core::traits::TransactionLog;
use crate::types::{AccountId, LedgerError, TransactionId, TransactionRecord};

/// Thread-safe append-only transaction log
#[derive(Debug, Default)]
pub struct MemoryTransactionLog {
    by_account: DashMap<AccountId, Vec<TransactionRecord>>,
    // Position of each record inside its account vector. Valid forever since
    // entries are never removed or reordered.
    by_id: DashMap<TransactionId, (AccountId, usize)>,
}

impl MemoryTransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted(
        &self,
        account_id: AccountId,
        filter: impl Fn(&TransactionRecord) -> bool,
        limit: usize,
    ) -> Vec<TransactionRecord> {
        let Some(entries) = self.by_account.get(&account_id) else {
            return Vec::new();
        };
        let mut records: Vec<TransactionRecord> =
            entries.iter().filter(|r| filter(r)).cloned().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        records
    }
}

impl TransactionLog for MemoryTransactionLog {
    fn append(&self, record: TransactionRecord) -> Result<(), LedgerError> {
        let mut entries = self.by_account.entry(record.account_id).or_default();
        self.by_id
            .insert(record.transaction_id, (record.account_id, entries.len()));
        entries.push(record);
        Ok(())
    }

    fn find(&self, transaction_id: TransactionId) -> Option<TransactionRecord> {
        let (account_id, index) = *self.by_id.get(&transaction_id)?;
        self.by_account
            .get(&account_id)
            .and_then(|entries| entries.get(index).cloned())
    }

    fn history(&self, account_id: AccountId, limit: usize) -> Vec<TransactionRecord> {
        self.collect_sorted(account_id, |_| true, limit)
    }

    fn recent(
        &self,
        account_id: AccountId,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Vec<TransactionRecord> {
        self.collect_sorted(account_id, |record| record.timestamp >= since, limit)
    }
}
