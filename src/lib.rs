//! Verônica - a voice-driven command assistant
//!
//! This library provides the core functionality for the assistant:
//! - Voice processing (endpointing, STT, TTS, playback)
//! - A durable intent catalogue with interaction and feedback logs
//! - Wake-phrase command dispatch and substring intent matching
//! - Background feedback capture for commands that did not match
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │           Microphone  →  CaptureGateway               │
//! └────────────────────┬─────────────────────────────────┘
//!                      │ transcript
//! ┌────────────────────▼─────────────────────────────────┐
//! │  RunLoop → CommandDispatcher → IntentMatcher          │
//! │                   │                 │                 │
//! │          SynthesisGateway      IntentStore (SQLite)   │
//! │                   │                 ▲                 │
//! │                   │          FeedbackQueue worker     │
//! └───────────────────┼──────────────────────────────────┘
//!                     ▼
//!                  Speaker
//! ```

pub mod config;
pub mod daemon;
pub mod db;
pub mod dispatcher;
pub mod error;
pub mod feedback;
pub mod gateway;
pub mod matcher;
pub mod run_loop;
pub mod voice;

pub use config::Config;
pub use daemon::Daemon;
pub use db::{DbConn, DbPool, IntentStore};
pub use dispatcher::{CommandDispatcher, Dispatch, DispatchConfig, extract_command};
pub use error::{Error, Result};
pub use feedback::{FeedbackCollector, FeedbackConfig, FeedbackQueue};
pub use gateway::{CaptureGateway, MicrophoneGateway, SpeakerGateway, SynthesisGateway};
pub use matcher::IntentMatcher;
pub use run_loop::{RunLoop, RunLoopConfig};
