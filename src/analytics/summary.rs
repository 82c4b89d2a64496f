//! Windowed account summaries
//!
//! Everything here is computed in a single pass over the fetched window; the
//! analyzer feeds it at most the configured scan cap of records.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{Account, AccountId, TransactionRecord, TransactionType};

/// Spending buckets, counted over outgoing transactions only
/// (withdrawals and outbound transfers)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingPattern {
    pub weekday_spending: Decimal,
    pub weekend_spending: Decimal,
    /// 06:00-12:00
    pub morning_count: u32,
    /// 12:00-18:00
    pub afternoon_count: u32,
    /// 18:00-24:00
    pub evening_count: u32,
    /// 00:00-06:00
    pub night_count: u32,
}

impl SpendingPattern {
    fn observe(&mut self, record: &TransactionRecord) {
        // Monday..Friday = 1..5
        if record.timestamp.weekday().number_from_monday() <= 5 {
            self.weekday_spending += record.amount;
        } else {
            self.weekend_spending += record.amount;
        }

        match record.timestamp.hour() {
            6..=11 => self.morning_count += 1,
            12..=17 => self.afternoon_count += 1,
            18..=23 => self.evening_count += 1,
            _ => self.night_count += 1,
        }
    }
}

/// Summary of one account's transaction window
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub account_number: String,
    pub current_balance: Decimal,
    pub period_days: i64,
    pub transaction_count: usize,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub total_transfers_in: Decimal,
    pub total_transfers_out: Decimal,
    /// (deposits + transfers in) - (withdrawals + transfers out)
    pub net_change: Decimal,
    /// Sum of all amounts divided by the count, zero for an empty window
    pub average_amount: Decimal,
    pub largest_amount: Decimal,
    pub smallest_amount: Decimal,
    /// Transactions with amount at or above the high-value threshold
    pub high_value_count: usize,
    pub counts_by_type: BTreeMap<TransactionType, usize>,
    pub spending: SpendingPattern,
}

pub(crate) fn summarize_records(
    account: &Account,
    records: &[TransactionRecord],
    window_days: i64,
    high_value_threshold: Decimal,
) -> AccountSummary {
    let mut total_deposits = Decimal::ZERO;
    let mut total_withdrawals = Decimal::ZERO;
    let mut total_transfers_in = Decimal::ZERO;
    let mut total_transfers_out = Decimal::ZERO;
    let mut total_amount = Decimal::ZERO;
    let mut largest = Decimal::ZERO;
    let mut smallest: Option<Decimal> = None;
    let mut high_value_count = 0;
    let mut counts_by_type: BTreeMap<TransactionType, usize> = BTreeMap::new();
    let mut spending = SpendingPattern::default();

    for record in records {
        total_amount += record.amount;

        match record.transaction_type {
            TransactionType::Deposit => total_deposits += record.amount,
            TransactionType::Withdrawal => total_withdrawals += record.amount,
            TransactionType::TransferIn => total_transfers_in += record.amount,
            TransactionType::TransferOut => total_transfers_out += record.amount,
        }

        if record.amount >= high_value_threshold {
            high_value_count += 1;
        }
        if record.amount > largest {
            largest = record.amount;
        }
        smallest = Some(match smallest {
            Some(current) if current <= record.amount => current,
            _ => record.amount,
        });

        *counts_by_type.entry(record.transaction_type).or_default() += 1;

        if record.transaction_type.is_outgoing() {
            spending.observe(record);
        }
    }

    let average_amount = if records.is_empty() {
        Decimal::ZERO
    } else {
        total_amount / Decimal::from(records.len() as u64)
    };

    AccountSummary {
        account_id: account.account_id,
        account_number: account.account_number.clone(),
        current_balance: account.balance,
        period_days: window_days,
        transaction_count: records.len(),
        total_deposits,
        total_withdrawals,
        total_transfers_in,
        total_transfers_out,
        net_change: (total_deposits + total_transfers_in)
            - (total_withdrawals + total_transfers_out),
        average_amount,
        largest_amount: largest,
        smallest_amount: smallest.unwrap_or(Decimal::ZERO),
        high_value_count,
        counts_by_type,
        spending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountType;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn account() -> Account {
        Account::new(
            Uuid::new_v4(),
            AccountType::Checking,
            "1234567890".to_string(),
            Decimal::new(100_000, 2),
            "USD".to_string(),
        )
    }

    fn record(
        account: &Account,
        transaction_type: TransactionType,
        amount: i64,
        // year, month, day, hour
        when: (i32, u32, u32, u32),
    ) -> TransactionRecord {
        TransactionRecord::new(
            account.account_id,
            transaction_type,
            Decimal::new(amount, 2),
            "test",
        )
        .with_timestamp(
            Utc.with_ymd_and_hms(when.0, when.1, when.2, when.3, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_empty_window() {
        let account = account();
        let summary = summarize_records(&account, &[], 30, Decimal::new(1_000_000, 2));

        assert_eq!(summary.transaction_count, 0);
        assert_eq!(summary.net_change, Decimal::ZERO);
        assert_eq!(summary.average_amount, Decimal::ZERO);
        assert_eq!(summary.smallest_amount, Decimal::ZERO);
        assert_eq!(summary.current_balance, Decimal::new(100_000, 2));
    }

    #[test]
    fn test_totals_and_net_change() {
        let account = account();
        // 2024-06-03 is a Monday
        let records = vec![
            record(&account, TransactionType::Deposit, 40_000, (2024, 6, 3, 9)),
            record(&account, TransactionType::TransferIn, 10_000, (2024, 6, 3, 10)),
            record(&account, TransactionType::Withdrawal, 15_000, (2024, 6, 3, 11)),
            record(&account, TransactionType::TransferOut, 5_000, (2024, 6, 3, 12)),
        ];

        let summary = summarize_records(&account, &records, 30, Decimal::new(1_000_000, 2));

        assert_eq!(summary.transaction_count, 4);
        assert_eq!(summary.total_deposits, Decimal::new(40_000, 2));
        assert_eq!(summary.total_transfers_in, Decimal::new(10_000, 2));
        assert_eq!(summary.total_withdrawals, Decimal::new(15_000, 2));
        assert_eq!(summary.total_transfers_out, Decimal::new(5_000, 2));
        // (400 + 100) - (150 + 50) = 300
        assert_eq!(summary.net_change, Decimal::new(30_000, 2));
        // 700 / 4 = 175
        assert_eq!(summary.average_amount, Decimal::new(17_500, 2));
        assert_eq!(summary.largest_amount, Decimal::new(40_000, 2));
        assert_eq!(summary.smallest_amount, Decimal::new(5_000, 2));
        assert_eq!(summary.counts_by_type[&TransactionType::Deposit], 1);
        assert_eq!(summary.counts_by_type[&TransactionType::Withdrawal], 1);
    }

    #[test]
    fn test_high_value_counting() {
        let account = account();
        let records = vec![
            record(&account, TransactionType::Deposit, 1_200_000, (2024, 6, 3, 9)),
            record(&account, TransactionType::Deposit, 900_000, (2024, 6, 3, 10)),
            record(&account, TransactionType::Withdrawal, 1_000_000, (2024, 6, 3, 11)),
        ];

        let summary = summarize_records(&account, &records, 30, Decimal::new(1_000_000, 2));
        // Threshold is inclusive
        assert_eq!(summary.high_value_count, 2);
    }

    #[test]
    fn test_spending_pattern_only_counts_outgoing() {
        let account = account();
        let records = vec![
            // Monday morning withdrawal
            record(&account, TransactionType::Withdrawal, 10_000, (2024, 6, 3, 9)),
            // Saturday night transfer out
            record(&account, TransactionType::TransferOut, 5_000, (2024, 6, 8, 2)),
            // Sunday evening withdrawal
            record(&account, TransactionType::Withdrawal, 2_000, (2024, 6, 9, 19)),
            // Deposits never count as spending
            record(&account, TransactionType::Deposit, 99_000, (2024, 6, 8, 3)),
        ];

        let summary = summarize_records(&account, &records, 30, Decimal::new(1_000_000, 2));
        let spending = &summary.spending;

        assert_eq!(spending.weekday_spending, Decimal::new(10_000, 2));
        assert_eq!(spending.weekend_spending, Decimal::new(7_000, 2));
        assert_eq!(spending.morning_count, 1);
        assert_eq!(spending.afternoon_count, 0);
        assert_eq!(spending.evening_count, 1);
        assert_eq!(spending.night_count, 1);
    }
}
