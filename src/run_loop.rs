//! Continuous listen/dispatch loop

use std::sync::Arc;
use std::time::Duration;

use crate::dispatcher::{CommandDispatcher, Dispatch};
use crate::gateway::CaptureGateway;

/// Announced before each capture
pub const LISTEN_PROMPT: &str = "Aguardando comando...";

/// Pause between iterations
pub const IDLE_DELAY: Duration = Duration::from_secs(1);

/// Run loop settings
#[derive(Debug, Clone)]
pub struct RunLoopConfig {
    pub prompt: String,
    pub idle_delay: Duration,
}

impl Default for RunLoopConfig {
    fn default() -> Self {
        Self {
            prompt: LISTEN_PROMPT.to_string(),
            idle_delay: IDLE_DELAY,
        }
    }
}

/// Listens for utterances and hands each one to the dispatcher
pub struct RunLoop {
    capture: Arc<dyn CaptureGateway>,
    dispatcher: CommandDispatcher,
    config: RunLoopConfig,
}

impl RunLoop {
    /// Create a run loop
    #[must_use]
    pub fn new(
        capture: Arc<dyn CaptureGateway>,
        dispatcher: CommandDispatcher,
        config: RunLoopConfig,
    ) -> Self {
        Self {
            capture,
            dispatcher,
            config,
        }
    }

    /// Run a single iteration
    ///
    /// Listens without a timeout, dispatches a non-empty transcript, then
    /// waits for the idle delay. Returns `None` when nothing was heard.
    pub async fn run_once(&self) -> Option<Dispatch> {
        let utterance = self.capture.listen(&self.config.prompt, None, None).await;

        let outcome = if utterance.is_empty() {
            tracing::debug!("nothing heard");
            None
        } else {
            Some(self.dispatcher.dispatch(&utterance).await)
        };

        tokio::time::sleep(self.config.idle_delay).await;
        outcome
    }

    /// Loop forever
    ///
    /// Stops only when the task is aborted or the process exits.
    pub async fn run(self) {
        tracing::info!("listening for commands");
        loop {
            if let Some(outcome) = self.run_once().await {
                tracing::debug!(?outcome, "dispatch complete");
            }
        }
    }
}
