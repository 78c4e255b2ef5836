//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Per-page annotation sets, keyed by "<kind>:<normalized page url>".
-- The value column holds the full JSON array for the key; every write
-- replaces it wholesale.
CREATE TABLE IF NOT EXISTS annotation_sets (
    store_key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
