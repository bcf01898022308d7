//! Domain error model.

use thiserror::Error;

/// Result type used across the ledger domain.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error taxonomy.
///
/// Every variant is machine-distinguishable; API consumers rely on the kind
/// (not the message) to surface specific feedback. Keep this focused on
/// deterministic business failures; `Storage` is the only infrastructure
/// escape hatch and is always surfaced, never silently retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Deposit or transfer amount was not strictly positive (or not a
    /// representable currency value).
    #[error("amount must be greater than 0")]
    InvalidAmount,

    /// Transfer amount exceeds the sender's current balance.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Destination account number matched no account.
    #[error("receiver not found")]
    ReceiverNotFound,

    /// Transfers to the sender's own account number are rejected.
    #[error("cannot transfer to your own account")]
    SelfTransfer,

    /// Signup attempted with an email that is already registered.
    #[error("email already registered")]
    DuplicateEmail,

    /// Login failed (unknown email or wrong password, indistinguishable on
    /// purpose).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The referenced account no longer resolves (e.g. stale token subject).
    #[error("account not found")]
    AccountNotFound,

    /// Opaque storage-layer failure. The surrounding operation is aborted
    /// whole; no entries are left partially committed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
