//! Trait seams for the persistence collaborators
//!
//! The engine talks to its stores through these traits so the in-memory
//! implementations can be swapped for a networked KV backend offering the
//! same per-record conditional-write semantics. All traits are object-safe;
//! the engine holds them as `Arc<dyn ...>`.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::types::{
    Account, AccountId, AuthorizedAccount, LedgerError, OwnerId, TransactionId, TransactionRecord,
};

/// Owner of account records
///
/// The contract that matters is [`adjust`](AccountStore::adjust): the status
/// and floor predicates must be evaluated atomically with the write itself.
/// A backend that checks in one round trip and writes in another does not
/// implement this trait, whatever its signature says.
pub trait AccountStore: Send + Sync {
    /// Register a new account and its secondary indexes (number, owner).
    /// Fails with `InvalidArgument` if the account number is already in use.
    fn insert(&self, account: Account) -> Result<(), LedgerError>;

    /// Lookup by id. Absence is `None`, not an error.
    fn get(&self, account_id: AccountId) -> Option<Account>;

    /// Lookup by public 10-digit number.
    fn get_by_number(&self, account_number: &str) -> Option<Account>;

    /// All accounts of one owner; empty when none exist.
    fn list_by_owner(&self, owner_id: OwnerId) -> Vec<Account>;

    /// The conditional write. Atomically requires: the record exists
    /// (`AccountNotFound`), status is active (`AccountInactive`), and for
    /// negative deltas `balance + delta >= -overdraft_limit`
    /// (`InsufficientFunds`). On success the balance, `updated_at`, and
    /// `last_transaction_at` change in the same write and the post-write
    /// record is returned.
    fn adjust(&self, account_id: AccountId, delta: Decimal) -> Result<Account, LedgerError>;

    /// Conditional transition Active -> Closed, only when the balance is
    /// exactly zero (`NonZeroBalance` otherwise).
    fn close(&self, account_id: AccountId) -> Result<Account, LedgerError>;

    /// Verify an owner/account pairing and mint the token ledger operations
    /// require. Fails with `AccountNotFound` or `UnauthorizedAccess`.
    fn authorize(
        &self,
        account_id: AccountId,
        owner_id: OwnerId,
    ) -> Result<AuthorizedAccount, LedgerError>;

    /// Draw random 10-digit numbers until one is unused, bounded at
    /// `attempts` draws; fails with `NumberSpaceExhausted` instead of
    /// retrying forever.
    fn generate_account_number(&self, attempts: u32) -> Result<String, LedgerError> {
        let mut rng = rand::thread_rng();
        for _ in 0..attempts {
            let number: String = (0..10)
                .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                .collect();
            if self.get_by_number(&number).is_none() {
                return Ok(number);
            }
        }
        Err(LedgerError::NumberSpaceExhausted { attempts })
    }
}

/// Append-only record of balance-affecting events
///
/// Entries are immutable once appended and never deleted. Per-account
/// insertion order is monotone, so range queries over the timestamp sort key
/// are well-defined.
pub trait TransactionLog: Send + Sync {
    fn append(&self, record: TransactionRecord) -> Result<(), LedgerError>;

    fn find(&self, transaction_id: TransactionId) -> Option<TransactionRecord>;

    /// Newest-first history for one account, capped at `limit`.
    fn history(&self, account_id: AccountId, limit: usize) -> Vec<TransactionRecord>;

    /// Newest-first records with `timestamp >= since`, capped at `limit`.
    /// Callers pass the configured scan cap to keep latency predictable.
    fn recent(
        &self,
        account_id: AccountId,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Vec<TransactionRecord>;
}
