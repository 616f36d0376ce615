//! Interaction audit log
//!
//! One row per matched command. Rows are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{DbPool, checkout};
use crate::Result;

/// A matched command and the response that was spoken for it
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub id: i64,
    pub command: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// Interaction repository
#[derive(Clone)]
pub struct InteractionRepo {
    pool: DbPool,
}

impl InteractionRepo {
    /// Create a new interaction repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append an interaction
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn append(&self, command: &str, response: &str) -> Result<Interaction> {
        let conn = checkout(&self.pool)?;
        let timestamp = Utc::now();

        conn.execute(
            "INSERT INTO interactions (command, response, timestamp) VALUES (?1, ?2, ?3)",
            [command, response, &timestamp.to_rfc3339()],
        )?;

        Ok(Interaction {
            id: conn.last_insert_rowid(),
            command: command.to_string(),
            response: response.to_string(),
            timestamp,
        })
    }

    /// Most recent interactions, newest first
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn recent(&self, limit: usize) -> Result<Vec<Interaction>> {
        let conn = checkout(&self.pool)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(
            "SELECT id, command, response, timestamp FROM interactions
             ORDER BY id DESC LIMIT ?1",
        )?;

        let interactions = stmt
            .query_map([limit], |row| {
                Ok(Interaction {
                    id: row.get(0)?,
                    command: row.get(1)?,
                    response: row.get(2)?,
                    timestamp: parse_datetime(&row.get::<_, String>(3)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(interactions)
    }

    /// Number of logged interactions
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn count(&self) -> Result<i64> {
        let conn = checkout(&self.pool)?;
        let count = conn.query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
