use crate::error::CoreError;
use std::str::FromStr;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

pub type DbPool = SqlitePool;

/// Opens (creating if missing) the SQLite database at `database_path` and
/// applies pending migrations.
pub async fn establish_connection(database_path: &str) -> Result<DbPool, CoreError> {
    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    debug!(path = database_path, "database ready");
    Ok(pool)
}

/// A private in-memory database, mostly for tests.
pub async fn establish_in_memory() -> Result<DbPool, CoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    // Every connection to :memory: is a separate database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), CoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
