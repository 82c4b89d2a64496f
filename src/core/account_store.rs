//! In-memory account store
//!
//! `MemoryAccountStore` keeps account records in a `DashMap` and implements
//! the conditional-write contract of [`AccountStore`] by holding the record's
//! entry guard across both the predicate evaluation and the mutation. That
//! single critical section is what closes the overdraft race: two concurrent
//! withdrawals serialize on the entry, and the second one re-evaluates the
//! floor against the balance the first one left behind.

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::core::traits::AccountStore;
use crate::types::{
    Account, AccountId, AccountStatus, AuthorizedAccount, LedgerError, OwnerId,
};

/// Thread-safe account store with number and owner indexes
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: DashMap<AccountId, Account>,
    by_number: DashMap<String, AccountId>,
    by_owner: DashMap<OwnerId, Vec<AccountId>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryAccountStore {
    fn insert(&self, account: Account) -> Result<(), LedgerError> {
        // Claim the number index first so a concurrent insert with the same
        // number loses before any record exists.
        let claimed = *self
            .by_number
            .entry(account.account_number.clone())
            .or_insert(account.account_id);
        if claimed != account.account_id {
            return Err(LedgerError::invalid_argument(format!(
                "account number {} is already in use",
                account.account_number
            )));
        }

        self.by_owner
            .entry(account.owner_id)
            .or_default()
            .push(account.account_id);
        self.accounts.insert(account.account_id, account);
        Ok(())
    }

    fn get(&self, account_id: AccountId) -> Option<Account> {
        self.accounts
            .get(&account_id)
            .map(|entry| entry.value().clone())
    }

    fn get_by_number(&self, account_number: &str) -> Option<Account> {
        let account_id = *self.by_number.get(account_number)?;
        self.get(account_id)
    }

    fn list_by_owner(&self, owner_id: OwnerId) -> Vec<Account> {
        let Some(ids) = self.by_owner.get(&owner_id) else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| self.get(*id)).collect()
    }

    fn adjust(&self, account_id: AccountId, delta: Decimal) -> Result<Account, LedgerError> {
        let mut entry = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;
        let account = entry.value_mut();

        // Predicates and mutation share the entry guard; nothing can change
        // the record between the floor check and the write.
        if account.status != AccountStatus::Active {
            return Err(LedgerError::AccountInactive { account_id });
        }

        let new_balance = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::invalid_amount("balance adjustment overflows"))?;

        if delta < Decimal::ZERO && new_balance < account.balance_floor() {
            return Err(LedgerError::insufficient_funds(
                account_id,
                account.balance,
                -delta,
            ));
        }

        let now = Utc::now();
        account.balance = new_balance;
        account.updated_at = now;
        account.last_transaction_at = Some(now);

        Ok(account.clone())
    }

    fn close(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        let mut entry = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;
        let account = entry.value_mut();

        if account.status != AccountStatus::Active {
            return Err(LedgerError::AccountInactive { account_id });
        }
        if account.balance != Decimal::ZERO {
            return Err(LedgerError::NonZeroBalance {
                account_id,
                balance: account.balance,
            });
        }

        account.status = AccountStatus::Closed;
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    fn authorize(
        &self,
        account_id: AccountId,
        owner_id: OwnerId,
    ) -> Result<AuthorizedAccount, LedgerError> {
        let account = self
            .get(account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;
        if account.owner_id != owner_id {
            return Err(LedgerError::unauthorized(account_id));
        }
        Ok(AuthorizedAccount::new(account_id, owner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountType;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn sample_account(number: &str, balance: Decimal) -> Account {
        Account::new(
            Uuid::new_v4(),
            AccountType::Checking,
            number.to_string(),
            balance,
            "USD".to_string(),
        )
    }

    #[test]
    fn test_insert_and_get_by_id_and_number() {
        let store = MemoryAccountStore::new();
        let account = sample_account("1234567890", Decimal::new(10_000, 2));
        let account_id = account.account_id;

        store.insert(account).unwrap();

        assert_eq!(store.get(account_id).unwrap().account_id, account_id);
        assert_eq!(
            store.get_by_number("1234567890").unwrap().account_id,
            account_id
        );
        assert!(store.get_by_number("0000000000").is_none());
    }

    #[test]
    fn test_insert_rejects_duplicate_number() {
        let store = MemoryAccountStore::new();
        store
            .insert(sample_account("1234567890", Decimal::ZERO))
            .unwrap();

        let result = store.insert(sample_account("1234567890", Decimal::ZERO));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_list_by_owner_returns_only_that_owner() {
        let store = MemoryAccountStore::new();
        let owner = Uuid::new_v4();

        let mut first = sample_account("1111111111", Decimal::ZERO);
        first.owner_id = owner;
        let mut second = sample_account("2222222222", Decimal::ZERO);
        second.owner_id = owner;
        store.insert(first).unwrap();
        store.insert(second).unwrap();
        store
            .insert(sample_account("3333333333", Decimal::ZERO))
            .unwrap();

        assert_eq!(store.list_by_owner(owner).len(), 2);
        assert!(store.list_by_owner(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_adjust_credits_and_debits() {
        let store = MemoryAccountStore::new();
        let account = sample_account("1234567890", Decimal::new(50_000, 2));
        let account_id = account.account_id;
        store.insert(account).unwrap();

        let credited = store.adjust(account_id, Decimal::new(50_000, 2)).unwrap();
        assert_eq!(credited.balance, Decimal::new(100_000, 2));
        assert!(credited.last_transaction_at.is_some());

        let debited = store.adjust(account_id, Decimal::new(-25_000, 2)).unwrap();
        assert_eq!(debited.balance, Decimal::new(75_000, 2));
    }

    #[test]
    fn test_adjust_rejects_debit_below_floor() {
        let store = MemoryAccountStore::new();
        let account = sample_account("1234567890", Decimal::new(30_000, 2));
        let account_id = account.account_id;
        store.insert(account).unwrap();

        let result = store.adjust(account_id, Decimal::new(-100_000, 2));
        assert_eq!(
            result.unwrap_err(),
            LedgerError::insufficient_funds(
                account_id,
                Decimal::new(30_000, 2),
                Decimal::new(100_000, 2)
            )
        );

        // Balance unchanged after the rejection
        assert_eq!(store.get(account_id).unwrap().balance, Decimal::new(30_000, 2));
    }

    #[test]
    fn test_adjust_honors_overdraft_limit() {
        let store = MemoryAccountStore::new();
        let mut account = sample_account("1234567890", Decimal::new(10_000, 2));
        account.overdraft_limit = Decimal::new(5_000, 2);
        let account_id = account.account_id;
        store.insert(account).unwrap();

        // 100.00 balance with a 50.00 overdraft floor allows a 150.00 debit
        let debited = store.adjust(account_id, Decimal::new(-15_000, 2)).unwrap();
        assert_eq!(debited.balance, Decimal::new(-5_000, 2));

        // but not one cent more
        let result = store.adjust(account_id, Decimal::new(-1, 2));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InsufficientFunds { .. }
        ));
    }

    #[test]
    fn test_adjust_missing_account() {
        let store = MemoryAccountStore::new();
        let result = store.adjust(Uuid::new_v4(), Decimal::ONE);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AccountNotFound { .. }
        ));
    }

    #[test]
    fn test_adjust_rejects_closed_account() {
        let store = MemoryAccountStore::new();
        let account = sample_account("1234567890", Decimal::ZERO);
        let account_id = account.account_id;
        store.insert(account).unwrap();
        store.close(account_id).unwrap();

        let result = store.adjust(account_id, Decimal::ONE);
        assert_eq!(
            result.unwrap_err(),
            LedgerError::AccountInactive { account_id }
        );
    }

    #[test]
    fn test_close_requires_zero_balance() {
        let store = MemoryAccountStore::new();
        let account = sample_account("1234567890", Decimal::new(500, 2));
        let account_id = account.account_id;
        store.insert(account).unwrap();

        let result = store.close(account_id);
        assert_eq!(
            result.unwrap_err(),
            LedgerError::NonZeroBalance {
                account_id,
                balance: Decimal::new(500, 2)
            }
        );

        store.adjust(account_id, Decimal::new(-500, 2)).unwrap();
        let closed = store.close(account_id).unwrap();
        assert_eq!(closed.status, AccountStatus::Closed);
    }

    #[test]
    fn test_authorize_checks_owner_pairing() {
        let store = MemoryAccountStore::new();
        let account = sample_account("1234567890", Decimal::ZERO);
        let account_id = account.account_id;
        let owner = account.owner_id;
        store.insert(account).unwrap();

        let auth = store.authorize(account_id, owner).unwrap();
        assert_eq!(auth.account_id(), account_id);
        assert_eq!(auth.owner_id(), owner);

        let result = store.authorize(account_id, Uuid::new_v4());
        assert_eq!(result.unwrap_err(), LedgerError::unauthorized(account_id));
    }

    #[test]
    fn test_generate_account_number_is_ten_digits_and_unused() {
        let store = MemoryAccountStore::new();
        store
            .insert(sample_account("1234567890", Decimal::ZERO))
            .unwrap();

        let number = store.generate_account_number(10).unwrap();
        assert_eq!(number.len(), 10);
        assert!(number.chars().all(|c| c.is_ascii_digit()));
        assert!(store.get_by_number(&number).is_none());
    }

    #[test]
    fn test_generate_account_number_bounded_exhaustion() {
        /// Store whose number space is fully occupied: every lookup hits.
        struct SaturatedStore;

        impl AccountStore for SaturatedStore {
            fn insert(&self, _account: Account) -> Result<(), LedgerError> {
                unreachable!()
            }
            fn get(&self, _account_id: AccountId) -> Option<Account> {
                None
            }
            fn get_by_number(&self, number: &str) -> Option<Account> {
                Some(Account::new(
                    Uuid::new_v4(),
                    AccountType::Checking,
                    number.to_string(),
                    Decimal::ZERO,
                    "USD".to_string(),
                ))
            }
            fn list_by_owner(&self, _owner_id: OwnerId) -> Vec<Account> {
                Vec::new()
            }
            fn adjust(
                &self,
                _account_id: AccountId,
                _delta: Decimal,
            ) -> Result<Account, LedgerError> {
                unreachable!()
            }
            fn close(&self, _account_id: AccountId) -> Result<Account, LedgerError> {
                unreachable!()
            }
            fn authorize(
                &self,
                _account_id: AccountId,
                _owner_id: OwnerId,
            ) -> Result<AuthorizedAccount, LedgerError> {
                unreachable!()
            }
        }

        let result = SaturatedStore.generate_account_number(10);
        assert_eq!(
            result.unwrap_err(),
            LedgerError::NumberSpaceExhausted { attempts: 10 }
        );
    }

    #[test]
    fn test_concurrent_debits_never_breach_the_floor() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryAccountStore::new());
        // 100.00 balance, twenty threads each trying to debit 30.00
        let account = sample_account("1234567890", Decimal::new(10_000, 2));
        let account_id = account.account_id;
        store.insert(account).unwrap();

        let mut handles = vec![];
        for _ in 0..20 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store.adjust(account_id, Decimal::new(-3_000, 2)).is_ok()
            }));
        }

        let successes = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count();

        // Only three 30.00 debits fit into 100.00; the floor holds whatever
        // the interleaving was.
        assert_eq!(successes, 3);
        assert_eq!(
            store.get(account_id).unwrap().balance,
            Decimal::new(1_000, 2)
        );
    }

    #[test]
    fn test_idempotent_reads() {
        let store = MemoryAccountStore::new();
        let account = sample_account("1234567890", Decimal::new(10_000, 2));
        let account_id = account.account_id;
        store.insert(account).unwrap();

        let first = store.get(account_id).unwrap();
        let second = store.get(account_id).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_adjust_refreshes_timestamps() {
        let store = MemoryAccountStore::new();
        let account = sample_account("1234567890", Decimal::ZERO);
        let account_id = account.account_id;
        let created: DateTime<Utc> = account.created_at;
        store.insert(account).unwrap();

        let updated = store.adjust(account_id, Decimal::ONE).unwrap();
        assert!(updated.updated_at >= created);
        assert_eq!(updated.last_transaction_at, Some(updated.updated_at));
    }
}
