//! `ferrobank-auth`: authentication boundary (JWT + password hashing).
//!
//! This crate is intentionally decoupled from HTTP and storage: it signs and
//! verifies tokens and hashes credentials, nothing else. The ledger core
//! trusts the identity this layer produces and performs no credential checks
//! of its own.

pub mod claims;
pub mod config;
pub mod password;
pub mod token;

pub use claims::Claims;
pub use config::AuthConfig;
pub use password::{hash_password, verify_password};
pub use token::{AuthError, TokenSigner};
