//! Command dispatch
//!
//! Turns one recognized utterance into exactly one outcome: ignored (no wake
//! phrase), responded (intent matched), or apologized (no match, feedback
//! requested in the background).

use std::sync::Arc;

use crate::db::IntentStore;
use crate::feedback::FeedbackQueue;
use crate::gateway::SynthesisGateway;
use crate::matcher::IntentMatcher;

/// Wake phrase that addresses the assistant
pub const WAKE_PHRASE: &str = "verônica";

/// Short alias accepted in place of the wake phrase
pub const WAKE_ALIAS: &str = "vê";

/// Spoken when no intent matches
pub const APOLOGY: &str =
    "Desculpe, não entendi o comando. Você pode me explicar o que deseja fazer?";

/// Dispatch settings
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Wake phrase and aliases, stripped in order
    pub wake_words: Vec<String>,
    pub apology: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            wake_words: vec![WAKE_PHRASE.to_string(), WAKE_ALIAS.to_string()],
            apology: APOLOGY.to_string(),
        }
    }
}

/// Result of dispatching one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Utterance was not addressed to the assistant
    Ignored,
    /// An intent matched and its response was spoken
    Responded { command: String, response: String },
    /// Nothing matched; the apology was spoken and feedback requested
    Apologized { command: String },
}

/// Extract the command from an utterance addressed to the assistant
///
/// Returns `None` if no wake word is present. Otherwise every occurrence of
/// every wake word is deleted in place, whitespace is normalized and leading or
/// trailing punctuation left by the transcript is dropped. Matching is
/// case-insensitive; the command is returned lower-cased.
#[must_use]
pub fn extract_command(utterance: &str, wake_words: &[String]) -> Option<String> {
    let mut text = utterance.to_lowercase();
    let wake_words: Vec<String> = wake_words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    if !wake_words.iter().any(|w| text.contains(w.as_str())) {
        return None;
    }

    for wake_word in &wake_words {
        text = text.replace(wake_word.as_str(), "");
    }

    let command = text.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(command.trim_matches(is_edge_noise).to_string())
}

/// Whitespace or punctuation the transcript leaves around a command
fn is_edge_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '.' | '!' | '?' | ';' | ':')
}

/// Routes recognized utterances to responses or feedback capture
pub struct CommandDispatcher {
    matcher: IntentMatcher,
    store: IntentStore,
    synthesis: Arc<dyn SynthesisGateway>,
    feedback: FeedbackQueue,
    config: DispatchConfig,
}

impl CommandDispatcher {
    /// Create a dispatcher
    #[must_use]
    pub fn new(
        store: IntentStore,
        synthesis: Arc<dyn SynthesisGateway>,
        feedback: FeedbackQueue,
        config: DispatchConfig,
    ) -> Self {
        Self {
            matcher: IntentMatcher::new(store.clone()),
            store,
            synthesis,
            feedback,
            config,
        }
    }

    /// Handle one recognized utterance
    ///
    /// Speech always precedes the interaction log write. Feedback capture is
    /// queued, never awaited.
    pub async fn dispatch(&self, utterance: &str) -> Dispatch {
        let Some(command) = extract_command(utterance, &self.config.wake_words) else {
            tracing::debug!(utterance, "no wake word, ignoring");
            return Dispatch::Ignored;
        };

        tracing::info!(command = %command, "processing command");

        let response = self.matcher.find(&command).unwrap_or_else(|e| {
            tracing::warn!(error = %e, command = %command, "intent lookup failed");
            None
        });

        if let Some(response) = response {
            self.say(&response).await;
            self.store.append_interaction(&command, &response);
            Dispatch::Responded { command, response }
        } else {
            self.say(&self.config.apology).await;
            self.feedback.submit(&command);
            Dispatch::Apologized { command }
        }
    }

    async fn say(&self, text: &str) {
        if let Err(e) = self.synthesis.speak(text).await {
            tracing::warn!(error = %e, "speech synthesis failed");
        }
    }
}
