//! Banking Ledger Library
//! # Overview
//!
//! This library provides the ledger core of a banking system: accounts, the
//! transactions that mutate their balances, and a compliance layer that
//! scans transaction history for risk signals.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, TransactionRecord, errors)
//! - [`config`] - Business thresholds and bounds
//! - [`core`] - Money-moving components:
//!   - [`core::account_store`] - Account records behind an atomic
//!     conditional-write primitive
//!   - [`core::transaction_log`] - Append-only transaction history
//!   - [`core::ledger`] - Validated deposits, withdrawals, and account
//!     lifecycle
//!   - [`core::transfer`] - Two-account transfers with compensation on
//!     partial failure
//! - [`analytics`] - Windowed summaries and suspicious-activity detection
//! - [`notify`] - Fire-and-forget notification seam
//!
//! # Concurrency
//!
//! Any number of operations may run concurrently against the same or
//! different accounts. The single rule that keeps balances consistent is
//! that every mutation is one atomically-conditioned write: the store
//! evaluates the active-status and balance-floor predicates inside the same
//! critical section as the write itself, so concurrent debits can never
//! jointly overdraw an account. Transfers hold no cross-account lock;
//! instead the coordinator compensates the debit when the credit leg fails
//! and journals the rare case where compensation fails too.

// Module declarations
pub mod analytics;
pub mod config;
pub mod core;
pub mod notify;
pub mod types;

pub use analytics::{
    AccountSummary, ComplianceAnalyzer, ComplianceReport, ComplianceStatus, RiskLevel,
    SpendingPattern, SuspiciousPattern,
};
pub use config::LedgerConfig;
pub use core::{
    AccountStore, CompensationLog, LedgerEngine, MemoryAccountStore, MemoryCompensationLog,
    MemoryTransactionLog, PendingCompensation, TransactionLog, TransferCoordinator,
    TransferReceipt, TransferState,
};
pub use notify::{NotificationSink, NullNotifier, TracingNotifier, TransactionEvent};
pub use types::{
    Account, AccountId, AccountStatus, AccountType, AuthorizedAccount, LedgerError, OwnerId,
    TransactionId, TransactionRecord, TransactionStatus, TransactionType,
};
