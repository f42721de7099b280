use std::time::Duration;

use sqlx::postgres::{PgArguments, PgPoolOptions, Postgres};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

/// Errors from pool setup
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Get the process-wide connection pool, creating it lazily on first use
pub async fn pool() -> Result<PgPool, DbError> {
    POOL.get_or_try_init(|| async {
        let url =
            std::env::var("DATABASE_URL").map_err(|_| DbError::ConfigMissing("DATABASE_URL"))?;
        let cfg = config::config();

        let pool = PgPoolOptions::new()
            .max_connections(cfg.database.max_connections)
            .acquire_timeout(Duration::from_secs(cfg.database.acquire_timeout_secs))
            .connect(&url)
            .await?;

        info!("created database pool");
        Ok(pool)
    })
    .await
    .cloned()
}

/// Pings the pool to ensure connectivity
pub async fn health_check() -> Result<(), DbError> {
    let pool = pool().await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(())
}

/// A positionally-bound statement parameter.
///
/// The query builders are pure: they return SQL text plus a `Vec<SqlValue>`,
/// which gets bound onto an sqlx query at the call site. This keeps the
/// builders unit-testable without a live connection.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl SqlValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Int(i) => Some(*i as f64),
            SqlValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

pub fn bind_values<'q>(
    query: sqlx::query::Query<'q, Postgres, PgArguments>,
    values: &'q [SqlValue],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    values.iter().fold(query, |q, value| match value {
        SqlValue::Text(s) => q.bind(s.as_str()),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Bool(b) => q.bind(*b),
    })
}

pub fn bind_values_as<'q, T>(
    query: sqlx::query::QueryAs<'q, Postgres, T, PgArguments>,
    values: &'q [SqlValue],
) -> sqlx::query::QueryAs<'q, Postgres, T, PgArguments> {
    values.iter().fold(query, |q, value| match value {
        SqlValue::Text(s) => q.bind(s.as_str()),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Bool(b) => q.bind(*b),
    })
}

/// True when the error is a store-level unique constraint violation.
/// The constraint is the final arbiter for duplicate natural keys; the
/// services' existence probes are only a fast-path rejection.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        db.code().as_deref() == Some("23505")
    } else {
        false
    }
}

/// True when the error is a foreign key violation (e.g. a job referencing
/// a company handle that does not exist).
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        db.code().as_deref() == Some("23503")
    } else {
        false
    }
}
