//! Compliance analytics over the transaction log
//!
//! The analyzer reads windows of an account's history and derives summaries,
//! spending patterns, and suspicious-activity reports. Scans are bounded by
//! the configured record cap and recomputed on every call; there is no cache
//! in this layer (a deployment that needs one would add a bounded-TTL cache
//! keyed by account and window).

pub mod compliance;
pub mod summary;

pub use compliance::{ComplianceReport, ComplianceStatus, RiskLevel, SuspiciousPattern};
pub use summary::{AccountSummary, SpendingPattern};

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::config::LedgerConfig;
use crate::core::traits::{AccountStore, TransactionLog};
use crate::types::{AccountId, LedgerError, TransactionRecord};

/// Read-side analyzer over account history
pub struct ComplianceAnalyzer {
    store: Arc<dyn AccountStore>,
    log: Arc<dyn TransactionLog>,
    config: LedgerConfig,
}

impl ComplianceAnalyzer {
    pub fn new(
        store: Arc<dyn AccountStore>,
        log: Arc<dyn TransactionLog>,
        config: LedgerConfig,
    ) -> Self {
        ComplianceAnalyzer { store, log, config }
    }

    /// Summarize the trailing `window_days` of history.
    pub fn summarize(
        &self,
        account_id: AccountId,
        window_days: i64,
    ) -> Result<AccountSummary, LedgerError> {
        self.summarize_at(account_id, window_days, Utc::now())
    }

    /// Same as [`summarize`](Self::summarize) with an explicit reference
    /// instant, so windows can be evaluated deterministically.
    pub fn summarize_at(
        &self,
        account_id: AccountId,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<AccountSummary, LedgerError> {
        let account = self
            .store
            .get(account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;
        let records = self.fetch_window(account_id, window_days, now);
        Ok(summary::summarize_records(
            &account,
            &records,
            window_days,
            self.config.high_value_threshold,
        ))
    }

    /// Scan the trailing `window_days` for suspicious activity.
    pub fn detect_suspicious(
        &self,
        account_id: AccountId,
        window_days: i64,
    ) -> Result<ComplianceReport, LedgerError> {
        self.detect_suspicious_at(account_id, window_days, Utc::now())
    }

    /// Same as [`detect_suspicious`](Self::detect_suspicious) with an
    /// explicit reference instant.
    pub fn detect_suspicious_at(
        &self,
        account_id: AccountId,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<ComplianceReport, LedgerError> {
        if self.store.get(account_id).is_none() {
            return Err(LedgerError::account_not_found(account_id));
        }
        let records = self.fetch_window(account_id, window_days, now);

        let high_value: Vec<&TransactionRecord> = records
            .iter()
            .filter(|record| record.amount >= self.config.high_value_threshold)
            .collect();
        let high_value_total = high_value.iter().map(|record| record.amount).sum();
        let large_cash_transactions: Vec<TransactionRecord> = high_value
            .iter()
            .filter(|record| !record.transaction_type.is_transfer())
            .map(|record| (*record).clone())
            .collect();

        let patterns = compliance::detect_patterns(
            &records,
            now,
            self.config.high_value_threshold,
            self.config.suspicious_activity_threshold,
        );
        let risk_level = compliance::risk_level(high_value.len(), patterns.len());
        let detected = !patterns.is_empty();

        Ok(ComplianceReport {
            account_id,
            period_days: window_days,
            high_value_threshold: self.config.high_value_threshold,
            high_value_count: high_value.len(),
            high_value_total,
            suspicious_activity_detected: detected,
            patterns,
            risk_level,
            large_cash_transactions,
            status: if detected {
                ComplianceStatus::ReviewRequired
            } else {
                ComplianceStatus::Normal
            },
        })
    }

    fn fetch_window(
        &self,
        account_id: AccountId,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Vec<TransactionRecord> {
        let since = now - Duration::days(window_days);
        self.log
            .recent(account_id, since, self.config.max_scan_records)
    }
}
