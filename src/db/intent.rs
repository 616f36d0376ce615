//! Intent catalogue repository
//!
//! Intents and their responses are curated out of band (see the `intent`
//! CLI subcommands); the runtime only reads them.

use rusqlite::OptionalExtension;
use serde::Serialize;

use super::{DbPool, checkout};
use crate::matcher;
use crate::{Error, Result};

/// A named category of request the assistant can recognize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// One candidate reply for an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub id: i64,
    pub intent_id: i64,
    pub response_text: String,
}

/// Intent listing row with its response count
#[derive(Debug, Clone, Serialize)]
pub struct IntentSummary {
    #[serde(flatten)]
    pub intent: Intent,
    pub responses: i64,
}

/// An intent/response pair as scanned by the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCandidate {
    pub intent_id: i64,
    pub intent_name: String,
    pub response_text: String,
}

/// Intent repository
#[derive(Clone)]
pub struct IntentRepo {
    pool: DbPool,
}

impl IntentRepo {
    /// Create a new intent repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create an intent together with its responses
    ///
    /// The intent and all of its responses are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty name or response, or a database error
    pub fn add_intent(
        &self,
        name: &str,
        description: Option<&str>,
        responses: &[String],
    ) -> Result<Intent> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("intent name must not be empty".to_string()));
        }
        if responses.iter().any(|r| r.trim().is_empty()) {
            return Err(Error::InvalidInput("response text must not be empty".to_string()));
        }

        let mut conn = checkout(&self.pool)?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO intents (name, description) VALUES (?1, ?2)",
            rusqlite::params![name, description],
        )?;
        let id = tx.last_insert_rowid();

        for text in responses {
            tx.execute(
                "INSERT INTO responses (intent_id, response_text) VALUES (?1, ?2)",
                rusqlite::params![id, text.trim()],
            )?;
        }

        tx.commit()?;

        tracing::info!(id, name, responses = responses.len(), "intent added");

        Ok(Intent {
            id,
            name: name.to_string(),
            description: description.map(ToString::to_string),
        })
    }

    /// Add a response to an existing intent
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the intent does not exist
    pub fn add_response(&self, intent_id: i64, text: &str) -> Result<Response> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("response text must not be empty".to_string()));
        }

        let conn = checkout(&self.pool)?;

        let exists = conn
            .query_row("SELECT 1 FROM intents WHERE id = ?1", [intent_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Err(Error::NotFound(format!("intent {intent_id}")));
        }

        conn.execute(
            "INSERT INTO responses (intent_id, response_text) VALUES (?1, ?2)",
            rusqlite::params![intent_id, text],
        )?;

        Ok(Response {
            id: conn.last_insert_rowid(),
            intent_id,
            response_text: text.to_string(),
        })
    }

    /// Find an intent by ID (returns None if not found)
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn find(&self, id: i64) -> Result<Option<Intent>> {
        let conn = checkout(&self.pool)?;

        let intent = conn
            .query_row(
                "SELECT id, name, description FROM intents WHERE id = ?1",
                [id],
                |row| {
                    Ok(Intent {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(intent)
    }

    /// List all intents in id order with their response counts
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list(&self) -> Result<Vec<IntentSummary>> {
        let conn = checkout(&self.pool)?;

        let mut stmt = conn.prepare(
            "SELECT i.id, i.name, i.description, COUNT(r.id)
             FROM intents i LEFT JOIN responses r ON r.intent_id = i.id
             GROUP BY i.id ORDER BY i.id",
        )?;

        let intents = stmt
            .query_map([], |row| {
                Ok(IntentSummary {
                    intent: Intent {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    },
                    responses: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(intents)
    }

    /// Responses of one intent, in id order
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn responses(&self, intent_id: i64) -> Result<Vec<Response>> {
        let conn = checkout(&self.pool)?;

        let mut stmt = conn.prepare(
            "SELECT id, intent_id, response_text FROM responses WHERE intent_id = ?1 ORDER BY id",
        )?;

        let responses = stmt
            .query_map([intent_id], |row| {
                Ok(Response {
                    id: row.get(0)?,
                    intent_id: row.get(1)?,
                    response_text: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(responses)
    }

    /// Every intent/response pair, ordered by intent id then response id
    ///
    /// Intents without responses are excluded by the join.
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn response_candidates(&self) -> Result<Vec<ResponseCandidate>> {
        let conn = checkout(&self.pool)?;

        let mut stmt = conn.prepare(
            "SELECT i.id, i.name, r.response_text
             FROM intents i JOIN responses r ON r.intent_id = i.id
             ORDER BY i.id, r.id",
        )?;

        let candidates = stmt
            .query_map([], |row| {
                Ok(ResponseCandidate {
                    intent_id: row.get(0)?,
                    intent_name: row.get(1)?,
                    response_text: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(candidates)
    }

    /// Find the response for a normalized command
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn find_response_for_command(&self, command: &str) -> Result<Option<String>> {
        if command.is_empty() {
            return Ok(None);
        }

        let candidates = self.response_candidates()?;
        Ok(matcher::select_response(command, &candidates).map(|c| c.response_text.clone()))
    }
}
