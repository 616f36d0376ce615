//! Database schema and migrations

use rusqlite::Connection;

use crate::Result;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
///
/// Idempotent: migrations are gated on `PRAGMA user_version` and every
/// statement is `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns error if migration fails
pub fn init(conn: &Connection) -> Result<()> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r"
        -- Intent catalogue, curated out of band
        CREATE TABLE IF NOT EXISTS intents (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0),
            description TEXT
        );

        -- Candidate responses for an intent
        CREATE TABLE IF NOT EXISTS responses (
            id INTEGER PRIMARY KEY,
            intent_id INTEGER NOT NULL REFERENCES intents(id),
            response_text TEXT NOT NULL CHECK(length(response_text) > 0)
        );

        CREATE INDEX IF NOT EXISTS idx_responses_intent ON responses(intent_id);

        -- Matched commands (append-only)
        CREATE TABLE IF NOT EXISTS interactions (
            id INTEGER PRIMARY KEY,
            command TEXT NOT NULL,
            response TEXT NOT NULL,
            timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        -- Explanations for unmatched commands (append-only)
        CREATE TABLE IF NOT EXISTS feedback (
            id INTEGER PRIMARY KEY,
            command TEXT NOT NULL,
            feedback TEXT NOT NULL
        );

        PRAGMA user_version = 1;
        ",
    )?;

    tracing::info!("migrated to schema v1");
    Ok(())
}
