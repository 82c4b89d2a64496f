//! Business configuration for the ledger
//!
//! Thresholds and bounds that parameterize validation, compliance scans, and
//! account-number generation. Defaults match the reference deployment; the
//! orchestration layer can deserialize overrides from its own config source.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Ledger-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Currency assigned to newly created accounts
    pub currency: String,

    /// Upper bound for any single deposit, withdrawal, or transfer
    pub max_transaction_amount: Decimal,

    /// Lower bound for transfers (deposits/withdrawals only require > 0)
    pub min_transfer_amount: Decimal,

    /// Amount at or above which a transaction counts as high-value
    pub high_value_threshold: Decimal,

    /// High-value transactions inside 24h that trigger a suspicious flag
    pub suspicious_activity_threshold: usize,

    /// Cap on records fetched per analytics scan, keeps latency bounded
    pub max_scan_records: usize,

    /// Bounded retries for account-number generation
    pub account_number_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            currency: "USD".to_string(),
            max_transaction_amount: Decimal::new(100_000_000, 2), // 1,000,000.00
            min_transfer_amount: Decimal::new(1, 2),              // 0.01
            high_value_threshold: Decimal::new(1_000_000, 2),     // 10,000.00
            suspicious_activity_threshold: 5,
            max_scan_records: 1000,
            account_number_attempts: 10,
        }
    }
}

impl LedgerConfig {
    /// Replace nonsensical zero bounds with their defaults, warning once per
    /// field. Deserialized configs go through this before use.
    pub fn validated(mut self) -> Self {
        let defaults = LedgerConfig::default();

        if self.max_transaction_amount <= Decimal::ZERO {
            warn!(
                given = %self.max_transaction_amount,
                fallback = %defaults.max_transaction_amount,
                "invalid max_transaction_amount, using default"
            );
            self.max_transaction_amount = defaults.max_transaction_amount;
        }

        if self.max_scan_records == 0 {
            warn!(
                fallback = defaults.max_scan_records,
                "invalid max_scan_records, using default"
            );
            self.max_scan_records = defaults.max_scan_records;
        }

        if self.account_number_attempts == 0 {
            warn!(
                fallback = defaults.account_number_attempts,
                "invalid account_number_attempts, using default"
            );
            self.account_number_attempts = defaults.account_number_attempts;
        }

        self
    }
}
