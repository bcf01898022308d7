//! Storage contract for accounts and the transaction log.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;

use ferrobank_ledger::{Account, AccountId, AccountNumber, Entry, LedgerError, Money, NewAccount};

/// Durable store behind every ledger operation.
///
/// Implementations must uphold two guarantees:
///
/// - each operation's writes (one entry for a deposit, two for a transfer,
///   account row + genesis entry at signup) commit as a single atomic unit;
///   a concurrent balance read never observes a partial write;
/// - concurrent transfers debiting the same sender serialize against the
///   balance-check-then-append sequence, so two transfers can never both
///   spend the same funds.
///
/// All domain validation goes through `ferrobank_ledger::ops`, so every
/// implementation rejects the same inputs with the same error kind before
/// any durable write.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create an account together with its genesis entry, as one unit.
    ///
    /// Generates a fresh unique 10-digit account number by sampling random
    /// candidates until a free one is found; a candidate lost to a
    /// concurrent signup is resampled, never surfaced as an error. Fails
    /// with `DuplicateEmail` if the email is already taken.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, LedgerError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, LedgerError>;

    async fn find_by_account_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, LedgerError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Current balance: the sum of all committed entry amounts for the
    /// account, exactly zero when none exist. Always computed fresh from the
    /// log; there is no cached balance anywhere.
    async fn balance_of(&self, account_id: AccountId) -> Result<Money, LedgerError>;

    /// All entries for an account, newest first. Finite and re-queryable.
    async fn entries_for(&self, account_id: AccountId) -> Result<Vec<Entry>, LedgerError>;

    /// Validate and append one deposit entry; returns the new balance.
    async fn deposit(&self, account_id: AccountId, amount: Money) -> Result<Money, LedgerError>;

    /// Validate and atomically append the transfer's debit/credit pair;
    /// returns the sender's new balance.
    ///
    /// `to_account` is the raw destination as the caller supplied it. A
    /// string that is not a well-formed account number resolves to no
    /// receiver, so the validation order in `ops::transfer_drafts` still
    /// applies (a bad destination never pre-empts the balance check).
    async fn transfer(
        &self,
        sender_id: AccountId,
        to_account: &str,
        amount: Money,
    ) -> Result<Money, LedgerError>;

    /// All accounts (admin table dump).
    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError>;

    /// All entries across accounts (admin table dump).
    async fn list_entries(&self) -> Result<Vec<Entry>, LedgerError>;
}
