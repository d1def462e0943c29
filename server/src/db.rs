//! SQLite connection pool and schema setup.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::OnceCell;

use crate::config::Config;

static POOL: OnceCell<SqlitePool> = OnceCell::const_new();

/// Process-wide pool, connected on first use and reused afterwards.
pub async fn shared(config: &Config) -> Result<&'static SqlitePool, sqlx::Error> {
    POOL.get_or_try_init(|| connect(&config.database_url, config.max_connections))
        .await
}

/// Open a pool for `url` and make sure the schema exists.
///
/// In-memory databases live only as long as their connection, so they are
/// pinned to a single connection that is never recycled.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    let pool_options = if is_in_memory(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    migrate(&pool).await?;
    tracing::debug!(url, "database ready");
    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todos (
            id BLOB PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            status INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}
