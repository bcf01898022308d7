//! Transaction entries: immutable signed monetary records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Money};

/// Entry identifier (storage-assigned).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl core::fmt::Display for EntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entry type tag.
///
/// `Withdraw` is part of the persisted vocabulary but no current operation
/// produces it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Deposit,
    Withdraw,
    TransferIn,
    TransferOut,
    AccountCreated,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "deposit",
            EntryKind::Withdraw => "withdraw",
            EntryKind::TransferIn => "transfer_in",
            EntryKind::TransferOut => "transfer_out",
            EntryKind::AccountCreated => "account_created",
        }
    }

    pub fn parse(s: &str) -> Option<EntryKind> {
        match s {
            "deposit" => Some(EntryKind::Deposit),
            "withdraw" => Some(EntryKind::Withdraw),
            "transfer_in" => Some(EntryKind::TransferIn),
            "transfer_out" => Some(EntryKind::TransferOut),
            "account_created" => Some(EntryKind::AccountCreated),
            _ => None,
        }
    }
}

impl core::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One committed, immutable monetary movement against exactly one account.
///
/// The log is append-only: entries are never updated or deleted, and an
/// account's balance is the sum of its entries' amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub account_id: AccountId,
    pub kind: EntryKind,
    pub amount: Money,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// An entry ready to be appended; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub account_id: AccountId,
    pub kind: EntryKind,
    pub amount: Money,
    pub description: String,
}

impl EntryDraft {
    /// The zero-amount genesis entry written together with a new account.
    pub fn genesis(account_id: AccountId) -> Self {
        Self {
            account_id,
            kind: EntryKind::AccountCreated,
            amount: Money::ZERO,
            description: "Account created with balance 0".to_string(),
        }
    }
}
