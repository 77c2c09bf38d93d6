//! Schema bootstrap
//!
//! The schema is a pair of tables created with `IF NOT EXISTS`, so running
//! the bootstrap on every start is safe.

use sqlx::PgPool;
use tracing::{info, instrument};

/// Statements creating every table and index the repositories use
pub const INITIAL_SCHEMA: &str = include_str!("../migrations/0001_initial.sql");

/// Create any missing tables and indexes
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(INITIAL_SCHEMA).execute(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}
