//! Suspicious-activity detection and risk scoring
//!
//! Two independent heuristics run over the same fetched window: a
//! velocity-by-value check (several high-value transactions inside 24 hours)
//! and a burst check (ten transactions inside one hour). Risk combines the
//! window-wide high-value count with the number of flagged patterns.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{AccountId, TransactionRecord};

/// Risk classification for a scanned window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Whether the report warrants a manual review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Normal,
    ReviewRequired,
}

/// A flagged activity pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuspiciousPattern {
    /// `count` high-value transactions inside the trailing 24 hours,
    /// at or above the configured flagging threshold
    MultipleHighValueTransactions { count: usize, threshold: usize },
    /// The ten most recent transactions span less than one hour
    RapidTransactionPattern { count: usize, span_minutes: i64 },
}

/// Compliance scan result for one account window
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub account_id: AccountId,
    pub period_days: i64,
    pub high_value_threshold: Decimal,
    /// High-value transactions across the whole window
    pub high_value_count: usize,
    pub high_value_total: Decimal,
    pub suspicious_activity_detected: bool,
    pub patterns: Vec<SuspiciousPattern>,
    pub risk_level: RiskLevel,
    /// High-value deposits and withdrawals (cash movements, reportable)
    pub large_cash_transactions: Vec<TransactionRecord>,
    pub status: ComplianceStatus,
}

/// Evaluate both heuristics. `records` must be newest first, as returned by
/// the transaction log.
pub(crate) fn detect_patterns(
    records: &[TransactionRecord],
    now: DateTime<Utc>,
    high_value_threshold: Decimal,
    suspicious_count_threshold: usize,
) -> Vec<SuspiciousPattern> {
    let mut patterns = Vec::new();

    // Velocity by value: high-value transactions in the trailing 24 hours
    let cutoff = now - Duration::hours(24);
    let recent_high_value = records
        .iter()
        .filter(|record| record.timestamp >= cutoff && record.amount >= high_value_threshold)
        .count();
    if recent_high_value >= suspicious_count_threshold {
        patterns.push(SuspiciousPattern::MultipleHighValueTransactions {
            count: recent_high_value,
            threshold: suspicious_count_threshold,
        });
    }

    // Burst: ten most recent transactions inside one hour
    if records.len() >= 10 {
        let span = records[0].timestamp - records[9].timestamp;
        if span < Duration::hours(1) {
            patterns.push(SuspiciousPattern::RapidTransactionPattern {
                count: 10,
                span_minutes: span.num_minutes(),
            });
        }
    }

    patterns
}

/// Score: +2 when the window-wide high-value count exceeds 5 (else +1 above
/// 2), +2 per flagged pattern; >=5 is High, >=3 Medium.
pub(crate) fn risk_level(high_value_count: usize, pattern_count: usize) -> RiskLevel {
    let mut score = 0;
    if high_value_count > 5 {
        score += 2;
    } else if high_value_count > 2 {
        score += 1;
    }
    score += 2 * pattern_count;

    if score >= 5 {
        RiskLevel::High
    } else if score >= 3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
