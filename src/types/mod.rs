//! Types module
//!
//! Contains core data structures used throughout the ledger:
//! - `account`: Account record, identifiers, and the authorization token
//! - `transaction`: Append-only transaction records
//! - `error`: Typed error taxonomy

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountId, AccountStatus, AccountType, AuthorizedAccount, OwnerId};
pub use error::LedgerError;
pub use transaction::{TransactionId, TransactionRecord, TransactionStatus, TransactionType};
