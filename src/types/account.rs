//! Account-related types for the banking ledger
//!
//! This module defines the Account record, its identifiers, and the
//! [`AuthorizedAccount`] token that proves an owner/account pairing has been
//! verified by the calling layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account identifier, assigned at creation and immutable afterwards.
pub type AccountId = Uuid;

/// Identifier of the user who owns an account.
pub type OwnerId = Uuid;

/// Supported account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

/// Account lifecycle status
///
/// Accounts are never deleted; a closed account is retained for audit and
/// rejects every balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Closed,
}

/// A monetary account record
///
/// The balance is an exact fixed-point decimal, scale = currency minor units.
/// Every mutation goes through the store's conditional write; the record is
/// never updated via a separate read-then-write sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque unique key, immutable for the lifetime of the record
    pub account_id: AccountId,

    /// Owning user, immutable
    pub owner_id: OwnerId,

    /// 10-digit public identifier, globally unique and immutable
    pub account_number: String,

    pub account_type: AccountType,

    /// Current balance; invariant: `balance >= -overdraft_limit` while active
    pub balance: Decimal,

    /// Currency code, fixed per account
    pub currency: String,

    pub status: AccountStatus,

    /// Floor below zero the balance may reach. Currently always zero, but the
    /// conditional write honors it wherever it is set.
    pub overdraft_limit: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Instant of the most recent balance mutation, if any
    pub last_transaction_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new active account with the requested opening balance.
    pub fn new(
        owner_id: OwnerId,
        account_type: AccountType,
        account_number: String,
        initial_balance: Decimal,
        currency: String,
    ) -> Self {
        let now = Utc::now();
        Account {
            account_id: Uuid::new_v4(),
            owner_id,
            account_number,
            account_type,
            balance: initial_balance,
            currency,
            status: AccountStatus::Active,
            overdraft_limit: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            last_transaction_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Lowest balance the account may reach.
    pub fn balance_floor(&self) -> Decimal {
        -self.overdraft_limit
    }

    /// Last four digits of the public account number, for notifications.
    pub fn number_suffix(&self) -> &str {
        let split = self.account_number.len().saturating_sub(4);
        &self.account_number[split..]
    }
}

/// Proof that the calling layer verified an owner/account pairing
///
/// Produced only by [`AccountStore::authorize`](crate::core::AccountStore::authorize).
/// Ledger and transfer operations take this token instead of a bare account
/// id, so an unverified id cannot reach a balance mutation.
#[derive(Debug, Clone)]
pub struct AuthorizedAccount {
    account_id: AccountId,
    owner_id: OwnerId,
}

impl AuthorizedAccount {
    pub(crate) fn new(account_id: AccountId, owner_id: OwnerId) -> Self {
        AuthorizedAccount {
            account_id,
            owner_id,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_active_with_requested_balance() {
        let owner = Uuid::new_v4();
        let account = Account::new(
            owner,
            AccountType::Checking,
            "1234567890".to_string(),
            Decimal::new(50_000, 2),
            "USD".to_string(),
        );

        assert_eq!(account.owner_id, owner);
        assert_eq!(account.balance, Decimal::new(50_000, 2));
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.overdraft_limit, Decimal::ZERO);
        assert!(account.last_transaction_at.is_none());
        assert!(account.is_active());
    }

    #[test]
    fn test_balance_floor_tracks_overdraft_limit() {
        let mut account = Account::new(
            Uuid::new_v4(),
            AccountType::Savings,
            "0000000001".to_string(),
            Decimal::ZERO,
            "USD".to_string(),
        );
        assert_eq!(account.balance_floor(), Decimal::ZERO);

        account.overdraft_limit = Decimal::new(10_000, 2);
        assert_eq!(account.balance_floor(), Decimal::new(-10_000, 2));
    }

    #[test]
    fn test_number_suffix_is_last_four_digits() {
        let account = Account::new(
            Uuid::new_v4(),
            AccountType::Checking,
            "9876543210".to_string(),
            Decimal::ZERO,
            "USD".to_string(),
        );
        assert_eq!(account.number_suffix(), "3210");
    }
}
