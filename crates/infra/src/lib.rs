//! `ferrobank-infra`: storage implementations for the ledger.
//!
//! Two implementations of the same [`store::LedgerStore`] contract:
//! Postgres for production and an in-memory store for tests/dev. Both commit
//! each ledger operation as one atomic unit and serialize concurrent
//! transfers from the same sender.

pub mod store;

pub use store::{LedgerStore, in_memory::InMemoryLedgerStore, postgres::PgLedgerStore};
