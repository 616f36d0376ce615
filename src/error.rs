//! Error types for the Verônica assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the assistant
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// The intent store cannot be opened or its schema created.
    ///
    /// Fatal: the assistant cannot run without its catalogue.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected input (empty intent name, empty response, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// `SQLite` error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
