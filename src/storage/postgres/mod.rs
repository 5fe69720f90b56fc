//! Postgres backend over a `sqlx` pool. Queries are built at runtime and
//! rows are mapped by hand.

mod chain;
mod meme_coins;
mod payments;
mod schema;
mod tokens;
mod users;

use super::{Storage, StoreError, StoreResult};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::str::FromStr;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!(statements = schema::STATEMENTS.len(), "Database schema ensured");
        Ok(())
    }
}

/// Turns unique violations (SQLSTATE 23505) into `StoreError::Duplicate`.
pub(crate) fn map_write_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            let what = db.constraint().unwrap_or("unique value").to_string();
            return StoreError::Duplicate(what);
        }
    }
    StoreError::Backend(err)
}

/// Reads a text column and parses it into one of the string-backed enums.
pub(crate) fn parse_col<T>(row: &PgRow, column: &str) -> StoreResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|e: T::Err| StoreError::Corrupt(format!("{column}: {e}")))
}

pub(crate) fn small_u8(row: &PgRow, column: &str) -> StoreResult<u8> {
    let value: i16 = row.try_get(column)?;
    u8::try_from(value).map_err(|_| StoreError::Corrupt(format!("{column} out of range: {value}")))
}

#[async_trait]
impl Storage for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
