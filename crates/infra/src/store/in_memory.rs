//! In-memory ledger store.
//!
//! Intended for tests and local development without a database. One async
//! mutex guards all state, which trivially gives every operation the
//! atomicity and same-sender serialization the [`LedgerStore`] contract
//! requires: a transfer's balance check and its two appends happen under a
//! single critical section.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;

use ferrobank_ledger::{
    Account, AccountId, AccountNumber, Entry, EntryDraft, EntryId, LedgerError, Money, NewAccount,
    ops,
};

use super::LedgerStore;

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<AccountId, Account>,
    entries: Vec<Entry>,
    next_account_id: i64,
    next_entry_id: i64,
}

impl Inner {
    fn balance_of(&self, account_id: AccountId) -> Money {
        Money::sum(
            self.entries
                .iter()
                .filter(|e| e.account_id == account_id)
                .map(|e| e.amount),
        )
    }

    fn append(&mut self, draft: &EntryDraft) {
        self.next_entry_id += 1;
        self.entries.push(Entry {
            id: EntryId(self.next_entry_id),
            account_id: draft.account_id,
            kind: draft.kind,
            amount: draft.amount,
            description: draft.description.clone(),
            created_at: Utc::now(),
        });
    }

    fn find_by_account_number(&self, number: &AccountNumber) -> Option<&Account> {
        self.accounts
            .values()
            .find(|a| a.account_number == *number)
    }
}

/// In-memory implementation of [`LedgerStore`]. Not durable.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: Mutex<Inner>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, LedgerError> {
        let mut inner = self.inner.lock().await;

        if inner.accounts.values().any(|a| a.email == new_account.email) {
            return Err(LedgerError::DuplicateEmail);
        }

        // One uniqueness check per sampled candidate, no retry bound.
        let account_number = loop {
            let candidate = AccountNumber::random(&mut rand::thread_rng());
            if inner.find_by_account_number(&candidate).is_none() {
                break candidate;
            }
        };

        inner.next_account_id += 1;
        let account = Account {
            id: AccountId(inner.next_account_id),
            name: new_account.name,
            email: new_account.email,
            password_hash: new_account.password_hash,
            account_number,
            role: new_account.role,
            created_at: Utc::now(),
        };

        inner.accounts.insert(account.id, account.clone());
        inner.append(&EntryDraft::genesis(account.id));

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_account_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner.find_by_account_number(number).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner.accounts.get(&id).cloned())
    }

    async fn balance_of(&self, account_id: AccountId) -> Result<Money, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner.balance_of(account_id))
    }

    async fn entries_for(&self, account_id: AccountId) -> Result<Vec<Entry>, LedgerError> {
        let inner = self.inner.lock().await;
        let mut entries: Vec<Entry> = inner
            .entries
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect();
        // Newest first; ids break ties between same-instant entries.
        entries.sort_by(|a, b| (b.created_at, b.id.0).cmp(&(a.created_at, a.id.0)));
        Ok(entries)
    }

    async fn deposit(&self, account_id: AccountId, amount: Money) -> Result<Money, LedgerError> {
        let draft = ops::deposit_draft(account_id, amount)?;

        let mut inner = self.inner.lock().await;
        if !inner.accounts.contains_key(&account_id) {
            return Err(LedgerError::AccountNotFound);
        }
        inner.append(&draft);
        Ok(inner.balance_of(account_id))
    }

    async fn transfer(
        &self,
        sender_id: AccountId,
        to_account: &str,
        amount: Money,
    ) -> Result<Money, LedgerError> {
        let mut inner = self.inner.lock().await;

        let sender = inner
            .accounts
            .get(&sender_id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound)?;
        let sender_balance = inner.balance_of(sender_id);
        // Malformed destinations resolve to no receiver; ops ranks that
        // below the balance check.
        let receiver = AccountNumber::parse(to_account)
            .ok()
            .and_then(|number| inner.find_by_account_number(&number).cloned());

        let drafts =
            ops::transfer_drafts(&sender, sender_balance, receiver.as_ref(), to_account, amount)?;

        // Both appends happen under the same lock: all-or-nothing.
        inner.append(&drafts.debit);
        inner.append(&drafts.credit);

        Ok(inner.balance_of(sender_id))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let inner = self.inner.lock().await;
        let mut accounts: Vec<Account> = inner.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| a.id.0);
        Ok(accounts)
    }

    async fn list_entries(&self) -> Result<Vec<Entry>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner.entries.clone())
    }
}
