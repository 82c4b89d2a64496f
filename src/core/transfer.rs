//! Two-account transfer coordination
//!
//! A transfer is two individually-atomic legs, a debit and a credit, with no
//! cross-account lock between them. When the credit leg fails the
//! coordinator re-credits the source; when that compensation also fails the
//! source is left debited and the attempt is journaled for reconciliation,
//! a fatal condition that pages an operator rather than a plain error.
//!
//! Each attempt walks the state machine
//! `Validating -> Debiting -> Crediting -> {Completed | Compensating ->
//! {Reverted | CompensationFailed}}`; no terminal state re-enters and no
//! half-applied attempt is retried automatically.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::ledger::LedgerEngine;
use crate::core::traits::AccountStore;
use crate::types::{
    AccountId, AuthorizedAccount, LedgerError, TransactionRecord, TransactionType,
};

/// Phases of one transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Validating,
    Debiting,
    Crediting,
    Completed,
    Compensating,
    Reverted,
    CompensationFailed,
}

/// Result of a completed transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub transfer_id: Uuid,
    pub state: TransferState,
    pub new_source_balance: Decimal,
    /// The `TransferOut` leg followed by the `TransferIn` leg
    pub records: [TransactionRecord; 2],
}

/// Journal entry for a transfer whose compensation failed
///
/// The named account is still debited by `amount`; a reconciliation job (or
/// an operator) replays the re-credit and then resolves the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCompensation {
    pub transfer_id: Uuid,
    pub account_id: AccountId,
    pub amount: Decimal,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

/// Durable store of pending compensations
pub trait CompensationLog: Send + Sync {
    fn record(&self, pending: PendingCompensation);

    /// Entries awaiting reconciliation.
    fn pending(&self) -> Vec<PendingCompensation>;

    /// Remove and return the entry for `transfer_id` once reconciled.
    fn resolve(&self, transfer_id: Uuid) -> Option<PendingCompensation>;
}

/// In-memory compensation journal
#[derive(Debug, Default)]
pub struct MemoryCompensationLog {
    entries: Mutex<Vec<PendingCompensation>>,
}

impl MemoryCompensationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompensationLog for MemoryCompensationLog {
    fn record(&self, pending: PendingCompensation) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(pending);
    }

    fn pending(&self) -> Vec<PendingCompensation> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn resolve(&self, transfer_id: Uuid) -> Option<PendingCompensation> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let index = entries
            .iter()
            .position(|entry| entry.transfer_id == transfer_id)?;
        Some(entries.remove(index))
    }
}

/// Coordinates two-leg transfers over the ledger engine
pub struct TransferCoordinator {
    store: Arc<dyn AccountStore>,
    ledger: Arc<LedgerEngine>,
    journal: Arc<dyn CompensationLog>,
}

impl TransferCoordinator {
    pub fn new(
        store: Arc<dyn AccountStore>,
        ledger: Arc<LedgerEngine>,
        journal: Arc<dyn CompensationLog>,
    ) -> Self {
        TransferCoordinator {
            store,
            ledger,
            journal,
        }
    }

    pub fn journal(&self) -> &Arc<dyn CompensationLog> {
        &self.journal
    }

    /// Move `amount` from the authorized source to the account with public
    /// number `to_account_number`.
    pub fn transfer(
        &self,
        auth: &AuthorizedAccount,
        to_account_number: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<TransferReceipt, LedgerError> {
        let transfer_id = Uuid::new_v4();
        debug!(%transfer_id, state = ?TransferState::Validating, %amount, "transfer started");

        self.ledger.validate_amount(amount, true)?;

        let source = self
            .store
            .get(auth.account_id())
            .ok_or_else(|| LedgerError::account_not_found(auth.account_id()))?;
        let dest = self
            .store
            .get_by_number(to_account_number)
            .ok_or_else(|| LedgerError::account_not_found(to_account_number))?;

        if source.account_id == dest.account_id {
            return Err(LedgerError::SelfTransferNotAllowed);
        }
        if !dest.is_active() {
            return Err(LedgerError::DestinationInactive {
                account_number: to_account_number.to_string(),
            });
        }

        // Debit leg. On failure nothing has changed; abort with the
        // underlying error.
        debug!(%transfer_id, state = ?TransferState::Debiting, account_id = %source.account_id, "debiting source");
        let debited = self.ledger.adjust(source.account_id, -amount)?;

        // Credit leg, compensating the debit if it fails.
        debug!(%transfer_id, state = ?TransferState::Crediting, account_id = %dest.account_id, "crediting destination");
        let credited = match self.ledger.adjust(dest.account_id, amount) {
            Ok(account) => account,
            Err(credit_error) => {
                warn!(
                    %transfer_id,
                    state = ?TransferState::Compensating,
                    error = %credit_error,
                    "credit leg failed, re-crediting source"
                );
                return match self.ledger.adjust(source.account_id, amount) {
                    Ok(_) => {
                        // Net no-op on balances; the caller sees why the
                        // credit failed.
                        info!(%transfer_id, state = ?TransferState::Reverted, "transfer reverted");
                        Err(credit_error)
                    }
                    Err(compensation_error) => {
                        error!(
                            %transfer_id,
                            state = ?TransferState::CompensationFailed,
                            account_id = %source.account_id,
                            %amount,
                            credit_error = %credit_error,
                            compensation_error = %compensation_error,
                            "compensation failed, source remains debited"
                        );
                        self.journal.record(PendingCompensation {
                            transfer_id,
                            account_id: source.account_id,
                            amount,
                            reason: format!(
                                "credit failed: {credit_error}; compensation failed: {compensation_error}"
                            ),
                            recorded_at: Utc::now(),
                        });
                        Err(LedgerError::CompensationFailed {
                            transfer_id,
                            account_id: source.account_id,
                            amount,
                        })
                    }
                };
            }
        };

        // Both legs applied; document them. Appends and notifications follow
        // the ledger's operational-error rules.
        let out_record = TransactionRecord::new(
            source.account_id,
            TransactionType::TransferOut,
            amount,
            &format!("{description} to {}", dest.account_number),
        )
        .with_related(dest.account_id);
        let in_record = TransactionRecord::new(
            dest.account_id,
            TransactionType::TransferIn,
            amount,
            &format!("{description} from {}", source.account_number),
        )
        .with_related(source.account_id);

        let out_record = self.ledger.record_completed(&debited, out_record);
        let in_record = self.ledger.record_completed(&credited, in_record);

        info!(
            %transfer_id,
            state = ?TransferState::Completed,
            from = %source.account_id,
            to = %dest.account_id,
            %amount,
            "transfer completed"
        );

        Ok(TransferReceipt {
            transfer_id,
            state: TransferState::Completed,
            new_source_balance: debited.balance,
            records: [out_record, in_record],
        })
    }
}
