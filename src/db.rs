use std::time::Duration;

use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use tracing::info;

use crate::config::{self, StorageConfig};

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Pool settings for `url`.
///
/// Each in-memory connection is its own database, so a memory pool holds exactly one
/// connection for the life of the process. Reaping it would silently drop the schema and data.
pub fn pool_options(url: &str, timeout_ms: u64) -> SqlitePoolOptions {
    let options = SqlitePoolOptions::new().acquire_timeout(Duration::from_millis(timeout_ms));
    if is_memory_url(url) {
        options.max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None)
    } else {
        options.max_connections(8)
    }
}

/// Opens (and if needed creates) the SQLite database named in the storage config,
/// then initializes the schema.
pub async fn connect(cfg: &StorageConfig) -> anyhow::Result<SqlitePool> {
    let db_url = &cfg.database_url;
    if !is_memory_url(db_url) {
        config::ensure_sqlite_parent_dir(db_url)?;
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating SQLite database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }
    }

    let pool = pool_options(db_url, cfg.timeout_ms).connect(db_url).await?;

    init_db(&pool).await?;
    Ok(pool)
}

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Pragmas for better durability/performance
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA busy_timeout=5000;").execute(pool).await {
        tracing::warn!("Failed to set busy_timeout: {}", e);
    }

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK (length(trim(title)) > 0),
            completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    if let Err(e) = sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_todos_created_desc ON todos(created_at DESC, id DESC)",
    )
    .execute(pool)
    .await
    {
        tracing::warn!("Failed to create index idx_todos_created_desc: {}", e);
    }
    if let Err(e) =
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_completed ON todos(completed)").execute(pool).await
    {
        tracing::warn!("Failed to create index idx_todos_completed: {}", e);
    }

    Ok(())
}
