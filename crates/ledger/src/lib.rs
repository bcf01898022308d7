//! `ferrobank-ledger`: pure domain building blocks for the ledger.
//!
//! This crate contains **pure domain** types and rules (no infrastructure
//! concerns): money, accounts, transaction entries, and the validation logic
//! behind deposits and transfers. Balances are never stored; they are always
//! derived as the sum of an account's signed entries.

pub mod account;
pub mod entry;
pub mod error;
pub mod money;
pub mod ops;

pub use account::{Account, AccountId, AccountNumber, NewAccount, Role};
pub use entry::{Entry, EntryDraft, EntryId, EntryKind};
pub use error::{LedgerError, LedgerResult};
pub use money::Money;
pub use ops::{TransferDrafts, deposit_draft, transfer_drafts};
