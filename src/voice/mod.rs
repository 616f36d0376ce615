//! Voice processing module
//!
//! Microphone capture with ambient-calibrated endpointing, cloud STT and TTS,
//! and speaker playback. The assistant core only sees these through the
//! gateways in `crate::gateway`.

mod capture;
mod http;
mod playback;
mod segmenter;
mod stt;
mod tts;

pub use capture::{AudioCapture, CaptureLimits, SAMPLE_RATE, record_utterance, samples_to_wav};
pub use http::{REQUEST_TIMEOUT, http_client};
pub use playback::{AudioPlayback, DecodedAudio, PLAYBACK_SAMPLE_RATE, decode_mp3, resample};
pub use segmenter::{SegmenterState, SpeechSegmenter, calculate_energy};
pub use stt::{SpeechToText, SttProvider};
pub use tts::{TextToSpeech, TtsProvider};
