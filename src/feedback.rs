//! Feedback capture for commands the assistant did not understand
//!
//! Unmatched commands are queued to a single worker task that asks the user
//! to explain each one in turn and records the answer. Every submitted
//! command produces exactly one feedback row, even when the queue is full or
//! the worker is gone (the sentinel is written instead).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::db::IntentStore;
use crate::gateway::CaptureGateway;

/// Stored when no explanation was captured
pub const FEEDBACK_NOT_PROVIDED: &str = "feedback não fornecido";

/// How long to wait for the explanation to start
pub const FEEDBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest explanation captured
pub const FEEDBACK_PHRASE_LIMIT: Duration = Duration::from_secs(10);

/// Pending explanations held before new ones skip capture
pub const FEEDBACK_QUEUE_CAPACITY: usize = 8;

/// Feedback capture settings
#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    pub timeout: Duration,
    pub phrase_limit: Duration,
    pub not_provided: String,
    pub queue_capacity: usize,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            timeout: FEEDBACK_TIMEOUT,
            phrase_limit: FEEDBACK_PHRASE_LIMIT,
            not_provided: FEEDBACK_NOT_PROVIDED.to_string(),
            queue_capacity: FEEDBACK_QUEUE_CAPACITY,
        }
    }
}

/// Prompt asking the user to explain `command`
#[must_use]
pub fn feedback_prompt(command: &str) -> String {
    format!("Você pode me explicar o comando '{command}'?")
}

/// Captures one explanation and writes it to the store
#[derive(Clone)]
pub struct FeedbackCollector {
    capture: Arc<dyn CaptureGateway>,
    store: IntentStore,
    config: FeedbackConfig,
}

impl FeedbackCollector {
    /// Create a collector
    #[must_use]
    pub fn new(
        capture: Arc<dyn CaptureGateway>,
        store: IntentStore,
        config: FeedbackConfig,
    ) -> Self {
        Self {
            capture,
            store,
            config,
        }
    }

    /// Ask for an explanation of `command` and record it
    ///
    /// Never fails: an empty or timed-out capture records the sentinel.
    pub async fn collect(&self, command: &str) {
        let explanation = self
            .capture
            .listen(
                &feedback_prompt(command),
                Some(self.config.timeout),
                Some(self.config.phrase_limit),
            )
            .await;

        if explanation.is_empty() {
            tracing::info!(command, "no feedback provided");
            self.record_not_provided(command);
        } else {
            tracing::info!(command, feedback = %explanation, "feedback captured");
            self.store.append_feedback(command, &explanation);
        }
    }

    fn record_not_provided(&self, command: &str) {
        self.store.append_feedback(command, &self.config.not_provided);
    }
}

/// Handle for submitting unmatched commands to the feedback worker
pub struct FeedbackQueue {
    tx: mpsc::Sender<String>,
    collector: FeedbackCollector,
}

impl FeedbackQueue {
    /// Spawn the feedback worker on the current runtime
    ///
    /// The worker exits once every queue handle is dropped and the backlog
    /// is drained.
    #[must_use]
    pub fn spawn(collector: FeedbackCollector) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<String>(collector.config.queue_capacity.max(1));

        let worker = collector.clone();
        let handle = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                worker.collect(&command).await;
            }
            tracing::debug!("feedback worker stopped");
        });

        (Self { tx, collector }, handle)
    }

    /// Queue `command` for feedback capture without waiting
    pub fn submit(&self, command: &str) {
        match self.tx.try_send(command.to_string()) {
            Ok(()) => tracing::debug!(command, "feedback capture queued"),
            Err(TrySendError::Full(command)) => {
                tracing::warn!(command = %command, "feedback queue full, skipping capture");
                self.collector.record_not_provided(&command);
            }
            Err(TrySendError::Closed(command)) => {
                tracing::warn!(command = %command, "feedback worker gone, skipping capture");
                self.collector.record_not_provided(&command);
            }
        }
    }
}
