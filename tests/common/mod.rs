//! Shared test utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use veronica::feedback::{FeedbackCollector, FeedbackConfig, FeedbackQueue};
use veronica::{
    CaptureGateway, CommandDispatcher, DispatchConfig, Error, IntentStore, Result,
    SynthesisGateway,
};

/// Set up an in-memory test store
#[must_use]
pub fn setup_test_store() -> IntentStore {
    IntentStore::open_in_memory().expect("failed to init test store")
}

/// Add an intent with the given responses
pub fn add_intent(store: &IntentStore, name: &str, responses: &[&str]) -> i64 {
    let responses: Vec<String> = responses.iter().map(ToString::to_string).collect();
    store
        .intents()
        .add_intent(name, None, &responses)
        .expect("failed to add test intent")
        .id
}

/// One call made to a [`ScriptedCapture`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenCall {
    pub prompt: String,
    pub timeout: Option<Duration>,
    pub phrase_limit: Option<Duration>,
}

/// Capture gateway returning queued transcripts, then `""`
#[derive(Default)]
pub struct ScriptedCapture {
    transcripts: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ListenCall>>,
}

impl ScriptedCapture {
    pub fn new(transcripts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            transcripts: Mutex::new(transcripts.iter().map(ToString::to_string).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ListenCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptureGateway for ScriptedCapture {
    async fn listen(
        &self,
        prompt: &str,
        timeout: Option<Duration>,
        phrase_limit: Option<Duration>,
    ) -> String {
        self.calls.lock().unwrap().push(ListenCall {
            prompt: prompt.to_string(),
            timeout,
            phrase_limit,
        });
        self.transcripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default()
    }
}

/// Synthesis gateway recording everything it is asked to say
pub struct RecordingSynth {
    spoken: Mutex<Vec<String>>,
    fail: bool,
    store: Option<IntentStore>,
    interactions_seen: Mutex<Vec<i64>>,
}

impl RecordingSynth {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            spoken: Mutex::new(Vec::new()),
            fail: false,
            store: None,
            interactions_seen: Mutex::new(Vec::new()),
        })
    }

    /// A synthesizer whose every call fails (after recording the text)
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            spoken: Mutex::new(Vec::new()),
            fail: true,
            store: None,
            interactions_seen: Mutex::new(Vec::new()),
        })
    }

    /// A synthesizer that notes the interaction count at each call
    pub fn observing(store: IntentStore) -> Arc<Self> {
        Arc::new(Self {
            spoken: Mutex::new(Vec::new()),
            fail: false,
            store: Some(store),
            interactions_seen: Mutex::new(Vec::new()),
        })
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn interactions_seen(&self) -> Vec<i64> {
        self.interactions_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SynthesisGateway for RecordingSynth {
    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());

        if let Some(store) = &self.store {
            let count = store.interactions().count()?;
            self.interactions_seen.lock().unwrap().push(count);
        }

        if self.fail {
            return Err(Error::Tts("speaker unplugged".to_string()));
        }
        Ok(())
    }
}

/// Build a dispatcher with a running feedback worker
pub fn dispatcher(
    store: &IntentStore,
    capture: Arc<ScriptedCapture>,
    synth: Arc<RecordingSynth>,
) -> (CommandDispatcher, tokio::task::JoinHandle<()>) {
    let collector = FeedbackCollector::new(capture, store.clone(), FeedbackConfig::default());
    let (queue, worker) = FeedbackQueue::spawn(collector);
    let dispatcher = CommandDispatcher::new(store.clone(), synth, queue, DispatchConfig::default());
    (dispatcher, worker)
}
