// SPDX-License-Identifier: Apache-2.0
//! # pave-ledger — The Local Account Ledger
//!
//! SQLite-backed mapping from merchant email to the processor-issued
//! connected-account identifier. This is the only state Pave owns;
//! everything else lives on the processor and is re-fetched on demand.
//!
//! ## Uniqueness
//!
//! `email` carries a `UNIQUE` constraint and all writes are upserts, so
//! one email maps to at most one row and a rebind affects exactly that
//! row. This closes the duplicate-row ambiguity of an append-only
//! ledger, where "first match" lookups silently picked one of several
//! historical rows.
//!
//! ## Failure policy
//!
//! Storage faults surface as [`LedgerError`] and propagate to the caller
//! unmodified. Storage is local; there is no retry at this layer.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use pave_core::ids::AccountId;
use pave_core::profile::EmailAddress;

/// Errors from ledger access.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The underlying store failed; fatal for the operation in flight.
    #[error("ledger storage fault: {0}")]
    Storage(#[from] sqlx::Error),

    /// A persisted row violates an invariant the write path enforces.
    #[error("ledger row corrupt: {detail}")]
    Corrupt { detail: String },
}

/// One merchant's row in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MerchantAccountRecord {
    /// Locally assigned row identity; survives rebinds.
    pub id: i64,
    pub email: String,
    pub business_type: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    /// Processor-issued account id; `None` until bound.
    pub external_account_id: Option<String>,
}

/// Handle to the merchant-account ledger.
#[derive(Debug, Clone)]
pub struct AccountLedger {
    pool: SqlitePool,
}

impl AccountLedger {
    /// Open (creating if missing) a ledger database at `path` and ensure
    /// the schema exists.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let ledger = Self { pool };
        ledger.init_schema().await?;
        Ok(ledger)
    }

    /// An in-memory ledger for tests and ephemeral runs.
    ///
    /// Pinned to a single connection: each SQLite `:memory:` connection
    /// is its own database.
    pub async fn in_memory() -> Result<Self, LedgerError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let ledger = Self { pool };
        ledger.init_schema().await?;
        Ok(ledger)
    }

    /// Close the underlying pool. Later calls fail with a storage fault.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn init_schema(&self) -> Result<(), LedgerError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS merchant_accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                business_type TEXT NOT NULL,
                country TEXT NOT NULL,
                created_at TEXT NOT NULL,
                external_account_id TEXT
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Resolve the external account id bound to `email`.
    ///
    /// `None` means "unresolved" — no row, or a row with no binding.
    /// Callers requiring a destination must treat `None` as a terminal
    /// resolution failure, never forward it remotely.
    pub async fn resolve_external_id(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AccountId>, LedgerError> {
        let raw: Option<Option<String>> = sqlx::query_scalar(
            "SELECT external_account_id FROM merchant_accounts WHERE email = ?1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match raw.flatten() {
            Some(value) => Ok(Some(AccountId::new(value).map_err(|e| {
                LedgerError::Corrupt {
                    detail: e.to_string(),
                }
            })?)),
            None => Ok(None),
        }
    }

    /// Fetch the row bound to an external account id, if any.
    pub async fn get_by_external_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<MerchantAccountRecord>, LedgerError> {
        let record = sqlx::query_as::<_, MerchantAccountRecord>(
            "SELECT id, email, business_type, country, created_at, external_account_id
             FROM merchant_accounts WHERE external_account_id = ?1 LIMIT 1",
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Fetch the row for an email, if any.
    pub async fn get_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<MerchantAccountRecord>, LedgerError> {
        let record = sqlx::query_as::<_, MerchantAccountRecord>(
            "SELECT id, email, business_type, country, created_at, external_account_id
             FROM merchant_accounts WHERE email = ?1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Insert or replace the binding for `email`.
    ///
    /// On conflict the existing row keeps its identity and creation time;
    /// descriptors and the account binding are overwritten.
    pub async fn upsert(
        &self,
        email: &EmailAddress,
        business_type: &str,
        country: &str,
        external_account_id: &AccountId,
    ) -> Result<(), LedgerError> {
        sqlx::query(
            "INSERT INTO merchant_accounts (email, business_type, country, created_at, external_account_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(email) DO UPDATE SET
                business_type = excluded.business_type,
                country = excluded.country,
                external_account_id = excluded.external_account_id",
        )
        .bind(email.as_str())
        .bind(business_type)
        .bind(country)
        .bind(Utc::now())
        .bind(external_account_id.as_str())
        .execute(&self.pool)
        .await?;
        tracing::debug!(email = email.as_str(), account_id = external_account_id.as_str(), "ledger binding upserted");
        Ok(())
    }

    /// Rebind the external account id for `email`, returning the number
    /// of rows affected (0 when the email is unknown, 1 otherwise).
    pub async fn rebind(
        &self,
        external_account_id: &AccountId,
        email: &EmailAddress,
    ) -> Result<u64, LedgerError> {
        let result = sqlx::query(
            "UPDATE merchant_accounts SET external_account_id = ?1 WHERE email = ?2",
        )
        .bind(external_account_id.as_str())
        .bind(email.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
