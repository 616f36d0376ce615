//! Configuration management
//!
//! Resolution order is env > TOML file > defaults. Only the voice adapters
//! and storage location are configurable; the dispatch behaviour (wake
//! phrase, prompts, timeouts) is fixed in the dispatcher, feedback and run
//! loop modules.

pub mod file;

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::voice::{SpeechToText, SttProvider, TextToSpeech, TtsProvider};
use crate::{Error, Result};

use file::VeronicaConfigFile;

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "veronica.db";

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory
    pub data_dir: PathBuf,

    /// Path to the intent store database
    pub db_path: PathBuf,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Recognition language
    pub language: String,

    /// STT backend
    pub stt_provider: SttProvider,

    /// STT model
    pub stt_model: String,

    /// TTS backend
    pub tts_provider: TtsProvider,

    /// TTS model
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0, `OpenAI` only)
    pub tts_speed: f64,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper and TTS)
    pub openai: Option<SecretString>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<SecretString>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<SecretString>,
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if an environment override is malformed
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        let data_dir = default_data_dir();

        // Ensure data dir exists
        std::fs::create_dir_all(&data_dir).ok();

        Self::resolve(fc, data_dir, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a parsed file and an env lookup
    ///
    /// # Errors
    ///
    /// Returns error if an environment override is malformed
    pub fn resolve(
        fc: VeronicaConfigFile,
        data_dir: PathBuf,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let db_path = env("VERONICA_DB_PATH")
            .map(PathBuf::from)
            .or(fc.storage.db_path)
            .unwrap_or_else(|| data_dir.join(DB_FILE_NAME));

        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY")
                .map(SecretString::from)
                .or(fc.api_keys.openai),
            deepgram: env("DEEPGRAM_API_KEY")
                .map(SecretString::from)
                .or(fc.api_keys.deepgram),
            elevenlabs: env("ELEVENLABS_API_KEY")
                .map(SecretString::from)
                .or(fc.api_keys.elevenlabs),
        };

        let stt_provider = match env("VERONICA_STT_PROVIDER") {
            Some(value) => value.parse()?,
            None => fc.voice.stt_provider.unwrap_or_default(),
        };
        let tts_provider = match env("VERONICA_TTS_PROVIDER") {
            Some(value) => value.parse()?,
            None => fc.voice.tts_provider.unwrap_or_default(),
        };

        let default_stt_model = match stt_provider {
            SttProvider::Whisper => "whisper-1",
            SttProvider::Deepgram => "nova-2",
        };
        let (default_tts_model, default_tts_voice) = match tts_provider {
            TtsProvider::OpenAI => ("tts-1", "nova"),
            TtsProvider::ElevenLabs => ("eleven_multilingual_v2", "21m00Tcm4TlvDq8ikWAM"),
        };

        let tts_speed = fc.voice.tts_speed.unwrap_or(1.0);
        if !(0.25..=4.0).contains(&tts_speed) {
            return Err(Error::Config(format!(
                "voice.tts_speed must be between 0.25 and 4.0, got {tts_speed}"
            )));
        }

        let voice = VoiceConfig {
            language: env("VERONICA_LANGUAGE")
                .or(fc.voice.language)
                .unwrap_or_else(|| "pt-BR".to_string()),
            stt_provider,
            stt_model: env("VERONICA_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| default_stt_model.to_string()),
            tts_provider,
            tts_model: env("VERONICA_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| default_tts_model.to_string()),
            tts_voice: env("VERONICA_TTS_VOICE")
                .or(fc.voice.tts_voice)
                .unwrap_or_else(|| default_tts_voice.to_string()),
            tts_speed,
        };

        Ok(Self {
            data_dir,
            db_path,
            voice,
            api_keys,
        })
    }

    /// Build the STT client for the configured provider
    ///
    /// # Errors
    ///
    /// Returns error if the provider's API key is missing
    pub fn speech_to_text(&self) -> Result<SpeechToText> {
        let key = match self.voice.stt_provider {
            SttProvider::Whisper => self.api_keys.openai.as_ref(),
            SttProvider::Deepgram => self.api_keys.deepgram.as_ref(),
        };

        SpeechToText::new(
            self.voice.stt_provider,
            expose(key),
            self.voice.stt_model.clone(),
            self.voice.language.clone(),
        )
    }

    /// Build the TTS client for the configured provider
    ///
    /// # Errors
    ///
    /// Returns error if the provider's API key is missing
    pub fn text_to_speech(&self) -> Result<TextToSpeech> {
        let key = match self.voice.tts_provider {
            TtsProvider::OpenAI => self.api_keys.openai.as_ref(),
            TtsProvider::ElevenLabs => self.api_keys.elevenlabs.as_ref(),
        };

        TextToSpeech::new(
            self.voice.tts_provider,
            expose(key),
            self.voice.tts_voice.clone(),
            self.voice.tts_model.clone(),
            self.voice.tts_speed,
        )
    }
}

/// Plain key for a client, empty when unset
fn expose(key: Option<&SecretString>) -> String {
    key.map(|k| k.expose_secret().to_string()).unwrap_or_default()
}

/// Data directory (~/.local/share/veronica on Linux)
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map_or_else(|| PathBuf::from("."), |d| d.data_dir().join("veronica"))
}
