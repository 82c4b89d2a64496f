//! Ledger engine
//!
//! Validates single-account operations and applies them through the account
//! store's conditional write, then documents each mutation in the
//! transaction log. The engine never decides sufficiency itself: the floor
//! predicate lives inside [`AccountStore::adjust`], evaluated atomically at
//! commit time, so a stale read can never authorize an overdraft.
//!
//! Log appends happen after the balance mutation. If an append fails the
//! money has already moved, so the operation still succeeds and the failure
//! goes out on the operational channel (`tracing::error!`) for the operator,
//! not to the caller as a failed deposit.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info};

use crate::config::LedgerConfig;
use crate::core::traits::{AccountStore, TransactionLog};
use crate::notify::{NotificationSink, TracingNotifier, TransactionEvent};
use crate::types::{
    Account, AccountId, AccountType, AuthorizedAccount, LedgerError, OwnerId, TransactionRecord,
    TransactionType,
};

/// Orchestrates validated balance mutations against the account store
pub struct LedgerEngine {
    store: Arc<dyn AccountStore>,
    log: Arc<dyn TransactionLog>,
    notifier: Arc<dyn NotificationSink>,
    config: LedgerConfig,
}

impl LedgerEngine {
    pub fn new(
        store: Arc<dyn AccountStore>,
        log: Arc<dyn TransactionLog>,
        config: LedgerConfig,
    ) -> Self {
        LedgerEngine {
            store,
            log,
            notifier: Arc::new(TracingNotifier),
            config,
        }
    }

    /// Replace the default tracing notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Create a new account for `owner_id` with the requested opening
    /// balance. The public account number is drawn with bounded retries.
    pub fn create_account(
        &self,
        owner_id: OwnerId,
        account_type: AccountType,
        initial_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_argument(
                "initial balance cannot be negative",
            ));
        }

        let number = self
            .store
            .generate_account_number(self.config.account_number_attempts)?;
        let account = Account::new(
            owner_id,
            account_type,
            number,
            initial_balance,
            self.config.currency.clone(),
        );
        self.store.insert(account.clone())?;

        info!(
            account_id = %account.account_id,
            owner_id = %owner_id,
            account_type = ?account_type,
            "account created"
        );
        Ok(account)
    }

    /// Credit `amount` to the account and append a deposit record.
    /// Returns the new balance and the record.
    pub fn deposit(
        &self,
        auth: &AuthorizedAccount,
        amount: Decimal,
        description: &str,
    ) -> Result<(Decimal, TransactionRecord), LedgerError> {
        self.validate_amount(amount, false)?;

        let account = self.store.adjust(auth.account_id(), amount)?;
        let record = TransactionRecord::new(
            auth.account_id(),
            TransactionType::Deposit,
            amount,
            description,
        );
        let record = self.record_completed(&account, record);

        info!(
            account_id = %auth.account_id(),
            amount = %amount,
            new_balance = %account.balance,
            "deposit completed"
        );
        Ok((account.balance, record))
    }

    /// Debit `amount` from the account and append a withdrawal record.
    /// `InsufficientFunds` surfaces verbatim from the store's conditional
    /// rejection.
    pub fn withdraw(
        &self,
        auth: &AuthorizedAccount,
        amount: Decimal,
        description: &str,
    ) -> Result<(Decimal, TransactionRecord), LedgerError> {
        self.validate_amount(amount, false)?;

        let account = self.store.adjust(auth.account_id(), -amount)?;
        let record = TransactionRecord::new(
            auth.account_id(),
            TransactionType::Withdrawal,
            amount,
            description,
        );
        let record = self.record_completed(&account, record);

        info!(
            account_id = %auth.account_id(),
            amount = %amount,
            new_balance = %account.balance,
            "withdrawal completed"
        );
        Ok((account.balance, record))
    }

    /// The raw conditional balance adjustment of the store, exposed for the
    /// transfer coordinator. Positive delta credits, negative debits.
    pub fn adjust(&self, account_id: AccountId, delta: Decimal) -> Result<Account, LedgerError> {
        self.store.adjust(account_id, delta)
    }

    /// Close the account; only valid on an active account with zero balance.
    pub fn close_account(&self, auth: &AuthorizedAccount) -> Result<Account, LedgerError> {
        let account = self.store.close(auth.account_id())?;
        info!(account_id = %auth.account_id(), "account closed");
        Ok(account)
    }

    pub fn balance(&self, auth: &AuthorizedAccount) -> Result<Decimal, LedgerError> {
        self.store
            .get(auth.account_id())
            .map(|account| account.balance)
            .ok_or_else(|| LedgerError::account_not_found(auth.account_id()))
    }

    /// Newest-first transaction history, capped at `limit`.
    pub fn history(&self, auth: &AuthorizedAccount, limit: usize) -> Vec<TransactionRecord> {
        self.log.history(auth.account_id(), limit)
    }

    pub fn accounts_for(&self, owner_id: OwnerId) -> Vec<Account> {
        self.store.list_by_owner(owner_id)
    }

    /// Amount bounds shared by all mutating operations. Transfers also have
    /// a configured minimum.
    pub(crate) fn validate_amount(
        &self,
        amount: Decimal,
        is_transfer: bool,
    ) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(
                "amount must be greater than zero",
            ));
        }
        if is_transfer && amount < self.config.min_transfer_amount {
            return Err(LedgerError::invalid_amount(format!(
                "minimum transfer amount is {}",
                self.config.min_transfer_amount
            )));
        }
        if amount > self.config.max_transaction_amount {
            return Err(LedgerError::invalid_amount(format!(
                "maximum transaction amount is {}",
                self.config.max_transaction_amount
            )));
        }
        Ok(())
    }

    /// Append the record documenting an already-applied mutation and fire
    /// the notification. The mutation is authoritative: an append failure is
    /// an operational error, never a rollback.
    pub(crate) fn record_completed(
        &self,
        account: &Account,
        record: TransactionRecord,
    ) -> TransactionRecord {
        if let Err(append_error) = self.log.append(record.clone()) {
            error!(
                account_id = %record.account_id,
                transaction_id = %record.transaction_id,
                transaction_type = ?record.transaction_type,
                amount = %record.amount,
                error = %append_error,
                "transaction log append failed after balance mutation"
            );
        }

        self.notifier.transaction_alert(TransactionEvent {
            owner_id: account.owner_id,
            transaction_type: record.transaction_type,
            amount: record.amount,
            account_number_suffix: account.number_suffix().to_string(),
            new_balance: account.balance,
        });

        record
    }
}
