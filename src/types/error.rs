//! Error types for the banking ledger
//!
//! Every operation returns one of these typed variants to its immediate
//! caller; nothing is flattened into a generic string on the way up. Failures
//! of the transaction log *after* a successful balance mutation are not
//! errors of the operation; they are reported on the operational channel
//! (see the ledger engine) because the money movement is authoritative.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::account::AccountId;

/// Main error type for ledger, transfer, and analytics operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range input, recoverable by caller correction.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Amount fails the configured bounds (non-positive, below the transfer
    /// minimum, or above the transaction maximum).
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// No record for the given account id or public account number.
    #[error("Account not found: {account}")]
    AccountNotFound {
        /// The id or public number that failed to resolve
        account: String,
    },

    /// The account exists but is not in `Active` status.
    #[error("Account {account_id} is not active")]
    AccountInactive { account_id: AccountId },

    /// Transfer destination resolved but is not active.
    #[error("Destination account {account_number} is not active")]
    DestinationInactive { account_number: String },

    /// A debit would push the balance below the account floor. Raised by the
    /// store's conditional write, never by a separate pre-check.
    #[error(
        "Insufficient funds for account {account_id}: available {available}, requested {requested}"
    )]
    InsufficientFunds {
        account_id: AccountId,
        available: Decimal,
        requested: Decimal,
    },

    /// Source and destination of a transfer are the same account.
    #[error("Cannot transfer to the same account")]
    SelfTransferNotAllowed,

    /// The owner/account pairing did not verify.
    #[error("Unauthorized access to account {account_id}")]
    UnauthorizedAccess { account_id: AccountId },

    /// Account-number generation exhausted its bounded retries. Operational;
    /// should alert.
    #[error("Account number space exhausted after {attempts} attempts")]
    NumberSpaceExhausted { attempts: u32 },

    /// Close requested on an account still holding funds.
    #[error("Cannot close account {account_id} with non-zero balance {balance}")]
    NonZeroBalance {
        account_id: AccountId,
        balance: Decimal,
    },

    /// A transfer credit failed and the compensating re-credit of the source
    /// failed too. Fatal: the source is left debited until reconciliation
    /// replays the pending-compensation journal entry.
    #[error(
        "Compensation failed for transfer {transfer_id}: account {account_id} left debited by {amount}"
    )]
    CompensationFailed {
        transfer_id: Uuid,
        account_id: AccountId,
        amount: Decimal,
    },

    /// The transaction log rejected an append.
    #[error("Transaction log append failed: {message}")]
    LogAppendFailed { message: String },
}

impl LedgerError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        LedgerError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_amount(message: impl Into<String>) -> Self {
        LedgerError::InvalidAmount {
            message: message.into(),
        }
    }

    /// Create an AccountNotFound error from an id or a public number.
    pub fn account_not_found(account: impl ToString) -> Self {
        LedgerError::AccountNotFound {
            account: account.to_string(),
        }
    }

    pub fn insufficient_funds(
        account_id: AccountId,
        available: Decimal,
        requested: Decimal,
    ) -> Self {
        LedgerError::InsufficientFunds {
            account_id,
            available,
            requested,
        }
    }

    pub fn unauthorized(account_id: AccountId) -> Self {
        LedgerError::UnauthorizedAccess { account_id }
    }
}
