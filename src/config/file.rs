//! TOML configuration file loading
//!
//! Supports `~/.config/veronica/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::voice::{SttProvider, TtsProvider};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct VeronicaConfigFile {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Storage configuration
#[derive(Debug, Default, Deserialize)]
pub struct StorageFileConfig {
    /// Database file path
    pub db_path: Option<PathBuf>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Recognition language (e.g. "pt-BR")
    pub language: Option<String>,

    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: Option<SttProvider>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS provider ("openai" or "elevenlabs")
    pub tts_provider: Option<TtsProvider>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "nova")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<SecretString>,
    pub deepgram: Option<SecretString>,
    pub elevenlabs: Option<SecretString>,
}

/// Load the TOML config file from the standard path
///
/// Returns `VeronicaConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> VeronicaConfigFile {
    config_file_path().map_or_else(VeronicaConfigFile::default, |path| load_from(&path))
}

/// Load a TOML config file from `path`, falling back to defaults
pub fn load_from(path: &Path) -> VeronicaConfigFile {
    if !path.exists() {
        return VeronicaConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VeronicaConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VeronicaConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/veronica/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("veronica").join("config.toml"))
}
