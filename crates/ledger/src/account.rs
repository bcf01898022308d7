//! Accounts: one user's monetary identity.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Internal account identifier (storage-assigned, never exposed for
/// addressing transfers).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl core::fmt::Display for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Externally shareable account handle: exactly 10 ASCII digits, unique
/// across the system, generated at signup and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Parse an externally supplied account number.
    ///
    /// A malformed number cannot match any account, so the failure is
    /// reported as `ReceiverNotFound`, the same error the caller would see
    /// after a lookup.
    pub fn parse(s: &str) -> Result<Self, crate::LedgerError> {
        if s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(crate::LedgerError::ReceiverNotFound)
        }
    }

    /// Sample a random candidate number (leading digit never zero).
    ///
    /// Uniqueness is the store's concern: it re-samples until the candidate
    /// is free, one distinct query per attempt.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(rng.gen_range(1_000_000_000u64..=9_999_999_999u64).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role fixed at account creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
///
/// Holds no balance: the current balance is always derived from the
/// account's transaction entries. Deliberately not `Serialize`: it carries
/// the credential hash, and outward mapping is the API layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub account_number: AccountNumber,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Data required to create an account. The credential is already hashed by
/// the auth layer; the store assigns id, account number, and timestamp.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
