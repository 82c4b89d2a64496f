//! Core ledger logic
//!
//! This module contains the components that own and mutate money:
//! - `traits` - Seams to the persistence collaborators
//! - `account_store` - In-memory account records with conditional writes
//! - `transaction_log` - Append-only record of balance mutations
//! - `ledger` - Validated single-account operations
//! - `transfer` - Two-account movement with compensation

pub mod account_store;
pub mod ledger;
pub mod traits;
pub mod transaction_log;
pub mod transfer;

pub use account_store::MemoryAccountStore;
pub use ledger::LedgerEngine;
pub use traits::{AccountStore, TransactionLog};
pub use transaction_log::MemoryTransactionLog;
pub use transfer::{
    CompensationLog, MemoryCompensationLog, PendingCompensation, TransferCoordinator,
    TransferReceipt, TransferState,
};
