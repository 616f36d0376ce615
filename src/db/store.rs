//! Intent store facade used by the runtime
//!
//! Reads propagate errors. Appends to the audit logs are fire-and-forget:
//! a failed write is logged and never reaches the dispatch path.

use std::path::Path;

use super::{DbPool, FeedbackRepo, IntentRepo, InteractionRepo};
use crate::{Error, Result};

/// Durable intent catalogue plus the interaction and feedback logs
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct IntentStore {
    pool: DbPool,
    intents: IntentRepo,
    interactions: InteractionRepo,
    feedback: FeedbackRepo,
}

impl IntentStore {
    /// Open (creating if needed) the store at `path`
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the database cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let pool = super::init(path)?;
        Ok(Self::from_pool(pool))
    }

    /// Open a throwaway in-memory store
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the database cannot be initialized
    pub fn open_in_memory() -> Result<Self> {
        let pool = super::init_memory()?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool
    #[must_use]
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            intents: IntentRepo::new(pool.clone()),
            interactions: InteractionRepo::new(pool.clone()),
            feedback: FeedbackRepo::new(pool.clone()),
            pool,
        }
    }

    /// Create the schema if absent
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the schema cannot be created
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
        super::schema::init(&conn).map_err(|e| Error::StorageUnavailable(e.to_string()))
    }

    /// Response for a normalized command, if any intent matches
    ///
    /// # Errors
    ///
    /// Returns error if the catalogue cannot be read
    pub fn find_response_for_command(&self, command: &str) -> Result<Option<String>> {
        self.intents.find_response_for_command(command)
    }

    /// Log a matched command
    pub fn append_interaction(&self, command: &str, response: &str) {
        match self.interactions.append(command, response) {
            Ok(row) => tracing::debug!(id = row.id, command, "interaction logged"),
            Err(e) => tracing::warn!(error = %e, command, "failed to log interaction"),
        }
    }

    /// Log an explanation for an unmatched command
    pub fn append_feedback(&self, command: &str, feedback: &str) {
        match self.feedback.append(command, feedback) {
            Ok(row) => tracing::debug!(id = row.id, command, "feedback logged"),
            Err(e) => tracing::warn!(error = %e, command, "failed to log feedback"),
        }
    }

    /// Intent catalogue repository
    #[must_use]
    pub const fn intents(&self) -> &IntentRepo {
        &self.intents
    }

    /// Interaction log repository
    #[must_use]
    pub const fn interactions(&self) -> &InteractionRepo {
        &self.interactions
    }

    /// Feedback log repository
    #[must_use]
    pub const fn feedback(&self) -> &FeedbackRepo {
        &self.feedback
    }
}
