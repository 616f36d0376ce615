//! Capture and synthesis gateways
//!
//! The assistant core talks to the microphone and speaker only through these
//! traits. Capture never fails from the caller's point of view: every failure
//! (timeout, unintelligible audio, recognition service down) is an empty
//! string.

use std::time::Duration;

use async_trait::async_trait;

use crate::voice::{
    AudioPlayback, CaptureLimits, SAMPLE_RATE, SpeechToText, TextToSpeech, record_utterance,
    samples_to_wav,
};
use crate::{Config, Error, Result};

/// Speech-to-text boundary
#[async_trait]
pub trait CaptureGateway: Send + Sync {
    /// Announce `prompt`, capture one utterance and return its transcript
    ///
    /// Returns an empty string when nothing usable was heard.
    async fn listen(
        &self,
        prompt: &str,
        timeout: Option<Duration>,
        phrase_limit: Option<Duration>,
    ) -> String;
}

/// Text-to-speech boundary
#[async_trait]
pub trait SynthesisGateway: Send + Sync {
    /// Speak `text`, resolving once playback has finished
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Microphone + cloud STT
pub struct MicrophoneGateway {
    stt: SpeechToText,
}

impl MicrophoneGateway {
    /// Create a gateway using the configured STT provider
    ///
    /// # Errors
    ///
    /// Returns error if the STT provider is not configured
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            stt: config.speech_to_text()?,
        })
    }

    async fn capture(&self, limits: CaptureLimits) -> Result<Option<Vec<u8>>> {
        let samples = tokio::task::spawn_blocking(move || record_utterance(limits))
            .await
            .map_err(|e| Error::Audio(e.to_string()))??;

        samples
            .map(|samples| samples_to_wav(&samples, SAMPLE_RATE))
            .transpose()
    }
}

#[async_trait]
impl CaptureGateway for MicrophoneGateway {
    async fn listen(
        &self,
        prompt: &str,
        timeout: Option<Duration>,
        phrase_limit: Option<Duration>,
    ) -> String {
        tracing::info!("{prompt}");

        let limits = CaptureLimits {
            timeout,
            phrase_limit,
        };

        let wav = match self.capture(limits).await {
            Ok(Some(wav)) => wav,
            Ok(None) => {
                tracing::info!("no audio detected within timeout");
                return String::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "audio capture failed");
                return String::new();
            }
        };

        match self.stt.transcribe(&wav).await {
            Ok(text) => {
                let text = text.trim().to_lowercase();
                if text.is_empty() {
                    tracing::info!("speech not understood");
                } else {
                    tracing::info!(transcript = %text, "heard");
                }
                text
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech recognition service failed");
                String::new()
            }
        }
    }
}

/// Cloud TTS + speaker
///
/// Owns the synthesis engine for the lifetime of the assistant; created once
/// at startup and handed to the dispatcher.
pub struct SpeakerGateway {
    tts: TextToSpeech,
    playback: AudioPlayback,
}

impl SpeakerGateway {
    /// Acquire the synthesis engine and output device
    ///
    /// # Errors
    ///
    /// Returns error if the TTS provider is not configured or there is no
    /// output device
    pub fn new(config: &Config) -> Result<Self> {
        let tts = config.text_to_speech()?;
        let playback = AudioPlayback::new()?;

        tracing::info!(
            provider = ?config.voice.tts_provider,
            voice = %config.voice.tts_voice,
            "synthesis engine acquired"
        );

        Ok(Self { tts, playback })
    }
}

impl Drop for SpeakerGateway {
    fn drop(&mut self) {
        tracing::info!("synthesis engine released");
    }
}

#[async_trait]
impl SynthesisGateway for SpeakerGateway {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::debug!(text, "speaking");

        let audio = self.tts.synthesize(text).await?;
        let playback = self.playback.clone();

        tokio::task::spawn_blocking(move || playback.play_mp3_blocking(&audio))
            .await
            .map_err(|e| Error::Audio(e.to_string()))?
    }
}
