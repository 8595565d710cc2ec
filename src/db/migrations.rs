//! Database migrations
//!
//! Versioned schema changes tracked in `schema_migrations`. One key-value
//! table per entity type: `users` keyed by username, `blogs` keyed by slug.

use crate::db::error::StoreResult;
use rusqlite::Connection;
use tracing::{info, warn};

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Credentials table (version 1)
const MIGRATION_V1: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY NOT NULL,
    password_hash TEXT NOT NULL
);
"#;

/// Blogs table (version 2)
const MIGRATION_V2: &str = r#"
CREATE TABLE IF NOT EXISTS blogs (
    slug TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '',
    author TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_blogs_created_at ON blogs(created_at);
"#;

const MIGRATIONS: &[(i64, &str, &str)] = &[
    (1, "Credentials table", MIGRATION_V1),
    (2, "Blogs table", MIGRATION_V2),
];

/// Highest schema version known to this build
pub const LATEST_VERSION: i64 = 2;

/// Apply every migration newer than the current schema version
pub fn run_migrations(conn: &mut Connection) -> StoreResult<()> {
    conn.execute_batch(MIGRATION_TABLE)?;

    let current_version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    info!(current_version, "Current database schema version");

    for (version, name, sql) in MIGRATIONS {
        if current_version < *version {
            info!("Applying migration v{}: {}", version, name);
            apply_migration(conn, *version, sql)?;
        }
    }

    Ok(())
}

fn apply_migration(conn: &mut Connection, version: i64, sql: &str) -> StoreResult<()> {
    let tx = conn.transaction()?;

    tx.execute_batch(sql).map_err(|e| {
        warn!("Migration v{} failed: {}", version, e);
        e
    })?;

    tx.execute("INSERT INTO schema_migrations (version) VALUES (?)", [version])?;
    tx.commit()?;

    info!("Migration v{} applied successfully", version);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        let max: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(max, LATEST_VERSION);
    }

    #[test]
    fn test_users_primary_key_enforced() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES ('alice', 'h1')",
            [],
        )
        .unwrap();
        let second = conn.execute(
            "INSERT INTO users (username, password_hash) VALUES ('alice', 'h2')",
            [],
        );
        assert!(second.is_err());
    }
}
