//! Outbound notification seam
//!
//! The ledger reports every successful balance mutation to a
//! [`NotificationSink`]. Delivery is fire-and-forget: the sink returns
//! nothing, and no failure inside a sink may roll back or fail a completed
//! mutation. Formatting and actual dispatch live outside this crate.

use rust_decimal::Decimal;

use crate::types::{OwnerId, TransactionType};

/// Payload handed to the sink after a completed mutation
#[derive(Debug, Clone)]
pub struct TransactionEvent {
    /// Recipient (resolution to an address happens in the dispatcher)
    pub owner_id: OwnerId,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    /// Last four digits of the account number, never the full number
    pub account_number_suffix: String,
    pub new_balance: Decimal,
}

/// Receiver of transaction alerts
pub trait NotificationSink: Send + Sync {
    /// Called after a successful deposit, withdrawal, or transfer leg.
    /// Implementations swallow their own failures.
    fn transaction_alert(&self, event: TransactionEvent);
}

/// Default sink: emits the alert as a structured log event.
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn transaction_alert(&self, event: TransactionEvent) {
        tracing::info!(
            owner_id = %event.owner_id,
            transaction_type = ?event.transaction_type,
            amount = %event.amount,
            account = %format!("...{}", event.account_number_suffix),
            new_balance = %event.new_balance,
            "transaction alert"
        );
    }
}

/// Sink that drops every event. Used where alerts are irrelevant (tests,
/// backfill jobs).
pub struct NullNotifier;

impl NotificationSink for NullNotifier {
    fn transaction_alert(&self, _event: TransactionEvent) {}
}
