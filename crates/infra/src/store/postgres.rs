//! Postgres-backed ledger store.
//!
//! Accounts and transaction entries live in two relational tables (see
//! `migrations/`). The transaction log is append-only: there is no UPDATE or
//! DELETE path for entries anywhere in this module, and balances are always
//! recomputed as `SUM(amount)` at query time.
//!
//! ## Atomicity and serialization
//!
//! Every financial operation runs inside one database transaction. A
//! transfer additionally locks the sender's account row with
//! `SELECT … FOR UPDATE` *before* reading the balance, so two concurrent
//! transfers from the same sender serialize: the second one re-reads the
//! balance after the first committed and fails with `InsufficientFunds`
//! instead of jointly overdrawing the account. The receiver's row is never
//! locked: credits need no balance check, and skipping the lock avoids
//! deadlocks between opposite transfers.
//!
//! ## Error mapping
//!
//! SQLx errors surface as `LedgerError::Storage`, except a unique violation
//! (`23505`) on the email column during signup, which is `DuplicateEmail`.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use ferrobank_ledger::{
    Account, AccountId, AccountNumber, Entry, EntryDraft, EntryId, EntryKind, LedgerError, Money,
    NewAccount, Role, ops,
};

use super::LedgerStore;

/// Postgres implementation of [`LedgerStore`].
///
/// Cloneable; the underlying pool handles connection sharing.
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the schema migrations bundled with this crate.
    pub async fn run_migrations(&self) -> Result<(), LedgerError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| LedgerError::storage(format!("migration failed: {e}")))
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password_hash, account_number, role, created_at";

const ENTRY_COLUMNS: &str = "id, account_id, kind, amount, description, created_at";

#[async_trait::async_trait]
impl LedgerStore for PgLedgerStore {
    #[instrument(skip(self, new_account), fields(email = %new_account.email), err)]
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, LedgerError> {
        // The account-number constraint arbitrates candidate collisions. A
        // lost race aborts the whole transaction, so every attempt runs in a
        // fresh one with a freshly sampled candidate.
        loop {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx_error("begin", e))?;

            // Same check the unique constraint enforces, but surfaced as the
            // domain error before any write.
            let existing = sqlx::query("SELECT 1 FROM accounts WHERE email = $1")
                .bind(&new_account.email)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("check_email", e))?;
            if existing.is_some() {
                return Err(LedgerError::DuplicateEmail);
            }

            let candidate = AccountNumber::random(&mut rand::thread_rng());

            let row = match sqlx::query(&format!(
                "INSERT INTO accounts (name, email, password_hash, account_number, role) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING {ACCOUNT_COLUMNS}"
            ))
            .bind(&new_account.name)
            .bind(&new_account.email)
            .bind(&new_account.password_hash)
            .bind(candidate.as_str())
            .bind(new_account.role.as_str())
            .fetch_one(&mut *tx)
            .await
            {
                Ok(row) => row,
                Err(e) if is_unique_violation(&e, "email") => {
                    return Err(LedgerError::DuplicateEmail);
                }
                // A concurrent signup claimed this candidate first; resample.
                Err(e) if is_unique_violation(&e, "account_number") => continue,
                Err(e) => return Err(map_sqlx_error("insert_account", e)),
            };

            let account = account_from_row(row)?;

            // Account row and genesis entry commit together; an account
            // without its genesis entry must never be observable.
            insert_entry(&mut tx, &EntryDraft::genesis(account.id)).await?;

            tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;

            tracing::info!(account_id = %account.id, "account created");
            return Ok(account);
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, LedgerError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_email", e))?;

        row.map(account_from_row).transpose()
    }

    async fn find_by_account_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, LedgerError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_number = $1"
        ))
        .bind(number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_account_number", e))?;

        row.map(account_from_row).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(account_from_row).transpose()
    }

    #[instrument(skip(self), fields(account_id = %account_id), err)]
    async fn balance_of(&self, account_id: AccountId) -> Result<Money, LedgerError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT AS balance \
             FROM transactions WHERE account_id = $1",
        )
        .bind(account_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("balance_of", e))?;

        let minor: i64 = row
            .try_get("balance")
            .map_err(|e| LedgerError::storage(format!("failed to read balance: {e}")))?;
        Ok(Money::from_minor(minor))
    }

    async fn entries_for(&self, account_id: AccountId) -> Result<Vec<Entry>, LedgerError> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM transactions \
             WHERE account_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("entries_for", e))?;

        rows.into_iter().map(entry_from_row).collect()
    }

    #[instrument(skip(self), fields(account_id = %account_id), err)]
    async fn deposit(&self, account_id: AccountId, amount: Money) -> Result<Money, LedgerError> {
        // Validation happens before the transaction is even opened.
        let draft = ops::deposit_draft(account_id, amount)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        insert_entry(&mut tx, &draft).await?;
        let new_balance = balance_in_tx(&mut tx, account_id).await?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(new_balance)
    }

    #[instrument(skip(self), fields(sender_id = %sender_id, to_account = %to_account), err)]
    async fn transfer(
        &self,
        sender_id: AccountId,
        to_account: &str,
        amount: Money,
    ) -> Result<Money, LedgerError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        // Row lock on the sender serializes concurrent transfers from the
        // same account for the rest of this transaction.
        let sender_row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 FOR UPDATE"
        ))
        .bind(sender_id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("lock_sender", e))?;
        let sender = sender_row
            .map(account_from_row)
            .transpose()?
            .ok_or(LedgerError::AccountNotFound)?;

        let sender_balance = balance_in_tx(&mut tx, sender_id).await?;

        // A malformed destination cannot match any row; skip the query and
        // let ops decide where "no receiver" ranks among the failures.
        let receiver = match AccountNumber::parse(to_account) {
            Ok(number) => sqlx::query(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_number = $1"
            ))
            .bind(number.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("resolve_receiver", e))?
            .map(account_from_row)
            .transpose()?,
            Err(_) => None,
        };

        // Errors here roll the transaction back on drop: nothing written.
        let drafts = ops::transfer_drafts(
            &sender,
            sender_balance,
            receiver.as_ref(),
            to_account,
            amount,
        )?;

        insert_entry(&mut tx, &drafts.debit).await?;
        insert_entry(&mut tx, &drafts.credit).await?;
        let new_balance = balance_in_tx(&mut tx, sender_id).await?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;

        tracing::info!(
            sender_id = %sender_id,
            to_account = %to_account,
            amount = %amount,
            "transfer committed"
        );
        Ok(new_balance)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_accounts", e))?;

        rows.into_iter().map(account_from_row).collect()
    }

    async fn list_entries(&self) -> Result<Vec<Entry>, LedgerError> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM transactions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_entries", e))?;

        rows.into_iter().map(entry_from_row).collect()
    }
}

async fn insert_entry(
    tx: &mut Transaction<'_, Postgres>,
    draft: &EntryDraft,
) -> Result<(), LedgerError> {
    sqlx::query(
        "INSERT INTO transactions (account_id, kind, amount, description) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(draft.account_id.0)
    .bind(draft.kind.as_str())
    .bind(draft.amount.as_minor())
    .bind(&draft.description)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_entry", e))?;
    Ok(())
}

/// Balance read inside the current transaction (sees this transaction's own
/// uncommitted writes, which is exactly what the post-operation balance
/// needs).
async fn balance_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    account_id: AccountId,
) -> Result<Money, LedgerError> {
    let row = sqlx::query(
        "SELECT COALESCE(SUM(amount), 0)::BIGINT AS balance \
         FROM transactions WHERE account_id = $1",
    )
    .bind(account_id.0)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("balance_in_tx", e))?;

    let minor: i64 = row
        .try_get("balance")
        .map_err(|e| LedgerError::storage(format!("failed to read balance: {e}")))?;
    Ok(Money::from_minor(minor))
}

fn account_from_row(row: sqlx::postgres::PgRow) -> Result<Account, LedgerError> {
    let id: i64 = get(&row, "id")?;
    let name: String = get(&row, "name")?;
    let email: String = get(&row, "email")?;
    let password_hash: String = get(&row, "password_hash")?;
    let number: String = get(&row, "account_number")?;
    let role: String = get(&row, "role")?;
    let created_at: DateTime<Utc> = get(&row, "created_at")?;

    Ok(Account {
        id: AccountId(id),
        name,
        email,
        password_hash,
        account_number: AccountNumber::parse(&number)
            .map_err(|_| LedgerError::storage(format!("malformed account number in storage: {number}")))?,
        role: Role::parse(&role)
            .ok_or_else(|| LedgerError::storage(format!("unknown role in storage: {role}")))?,
        created_at,
    })
}

fn entry_from_row(row: sqlx::postgres::PgRow) -> Result<Entry, LedgerError> {
    let id: i64 = get(&row, "id")?;
    let account_id: i64 = get(&row, "account_id")?;
    let kind: String = get(&row, "kind")?;
    let amount: i64 = get(&row, "amount")?;
    let description: String = get(&row, "description")?;
    let created_at: DateTime<Utc> = get(&row, "created_at")?;

    Ok(Entry {
        id: EntryId(id),
        account_id: AccountId(account_id),
        kind: EntryKind::parse(&kind)
            .ok_or_else(|| LedgerError::storage(format!("unknown entry kind in storage: {kind}")))?,
        amount: Money::from_minor(amount),
        description,
        created_at,
    })
}

fn get<'r, T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>>(
    row: &'r sqlx::postgres::PgRow,
    column: &str,
) -> Result<T, LedgerError> {
    row.try_get(column)
        .map_err(|e| LedgerError::storage(format!("failed to read column {column}: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> LedgerError {
    match err {
        sqlx::Error::Database(db_err) => LedgerError::storage(format!(
            "database error in {operation}: {}",
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            LedgerError::storage(format!("connection pool closed in {operation}"))
        }
        other => LedgerError::storage(format!("sqlx error in {operation}: {other}")),
    }
}

/// Unique violation (`23505`) on a constraint covering the named column.
fn is_unique_violation(err: &sqlx::Error, column: &str) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return db_err
                .constraint()
                .is_some_and(|c| c.contains(column));
        }
    }
    false
}
