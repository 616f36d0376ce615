//! Daemon - the assistant service
//!
//! Opens the intent store, acquires the voice gateways, and runs the
//! listen/dispatch loop in the background until interrupted.

use std::sync::Arc;

use crate::db::IntentStore;
use crate::dispatcher::{CommandDispatcher, DispatchConfig};
use crate::feedback::{FeedbackCollector, FeedbackConfig, FeedbackQueue};
use crate::gateway::{CaptureGateway, MicrophoneGateway, SpeakerGateway, SynthesisGateway};
use crate::run_loop::{RunLoop, RunLoopConfig};
use crate::{Config, Error, Result};

/// The Verônica daemon
pub struct Daemon {
    config: Config,
    store: IntentStore,
}

impl Daemon {
    /// Create a new daemon instance
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the intent store cannot be opened or
    /// its schema created
    pub fn new(config: Config) -> Result<Self> {
        let store = IntentStore::open(&config.db_path)?;
        store.ensure_schema()?;

        tracing::info!(path = %config.db_path.display(), "intent store ready");

        Ok(Self { config, store })
    }

    /// Wire the runtime from explicit gateways
    ///
    /// Spawns the feedback worker on the current runtime.
    #[must_use]
    pub fn build_run_loop(
        store: IntentStore,
        capture: Arc<dyn CaptureGateway>,
        synthesis: Arc<dyn SynthesisGateway>,
    ) -> RunLoop {
        let collector =
            FeedbackCollector::new(capture.clone(), store.clone(), FeedbackConfig::default());
        let (feedback, _worker) = FeedbackQueue::spawn(collector);

        let dispatcher =
            CommandDispatcher::new(store, synthesis, feedback, DispatchConfig::default());
        RunLoop::new(capture, dispatcher, RunLoopConfig::default())
    }

    /// Run the assistant until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if a voice gateway cannot be created or the run loop
    /// task fails
    pub async fn run(self) -> Result<()> {
        let capture: Arc<dyn CaptureGateway> = Arc::new(MicrophoneGateway::new(&self.config)?);
        let synthesis: Arc<dyn SynthesisGateway> = Arc::new(SpeakerGateway::new(&self.config)?);

        let run_loop = Self::build_run_loop(self.store, capture, synthesis);
        let mut handle = tokio::spawn(run_loop.run());

        tracing::info!("assistant running in background");

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::error!(error = %e, "failed to listen for shutdown signal");
                }
                tracing::info!("shutdown requested");
                handle.abort();
                Ok(())
            }
            joined = &mut handle => {
                joined.map_err(|e| Error::Audio(format!("run loop stopped: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::VeronicaConfigFile;

    fn config_with_db(db_path: &std::path::Path) -> Config {
        let db_path = db_path.display().to_string();
        Config::resolve(VeronicaConfigFile::default(), std::path::PathBuf::from("."), |key| {
            (key == "VERONICA_DB_PATH").then(|| db_path.clone())
        })
        .unwrap()
    }

    #[test]
    fn test_new_creates_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veronica.db");

        let daemon = Daemon::new(config_with_db(&path)).unwrap();

        assert!(path.exists());
        assert!(daemon.store.intents().list().unwrap().is_empty());
    }

    #[test]
    fn test_new_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = Daemon::new(config_with_db(&blocker.join("veronica.db")));
        assert!(matches!(result, Err(Error::StorageUnavailable(_))));
    }
}
