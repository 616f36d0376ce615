//! Feedback for commands the assistant did not understand
//!
//! Append-only. Curators read these rows to promote them into new intents.

use serde::Serialize;

use super::{DbPool, checkout};
use crate::Result;

/// A captured explanation for an unmatched command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub id: i64,
    pub command: String,
    pub feedback: String,
}

/// Feedback repository
#[derive(Clone)]
pub struct FeedbackRepo {
    pool: DbPool,
}

impl FeedbackRepo {
    /// Create a new feedback repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append a feedback row
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn append(&self, command: &str, feedback: &str) -> Result<Feedback> {
        let conn = checkout(&self.pool)?;

        conn.execute(
            "INSERT INTO feedback (command, feedback) VALUES (?1, ?2)",
            [command, feedback],
        )?;

        Ok(Feedback {
            id: conn.last_insert_rowid(),
            command: command.to_string(),
            feedback: feedback.to_string(),
        })
    }

    /// All feedback, oldest first
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list(&self) -> Result<Vec<Feedback>> {
        let conn = checkout(&self.pool)?;

        let mut stmt = conn.prepare("SELECT id, command, feedback FROM feedback ORDER BY id")?;

        let feedback = stmt
            .query_map([], |row| {
                Ok(Feedback {
                    id: row.get(0)?,
                    command: row.get(1)?,
                    feedback: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    /// Number of feedback rows
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn count(&self) -> Result<i64> {
        let conn = checkout(&self.pool)?;
        let count = conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))?;
        Ok(count)
    }
}
