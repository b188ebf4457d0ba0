//! TOML configuration file loading
//!
//! Supports `~/.config/sense/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of
//! defaults, with environment variables applied last.

use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct SenseConfigFile {
    /// Vision impairment profile selected at setup (e.g. "low-vision").
    /// Read once at startup; the gateway never writes it back.
    #[serde(default)]
    pub impairment: Option<String>,

    /// Content generation service
    #[serde(default)]
    pub generator: GeneratorFileConfig,

    /// Voice input/output
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Generation service configuration
#[derive(Debug, Default, Deserialize)]
pub struct GeneratorFileConfig {
    /// Service base URL (e.g. `http://localhost:8000`)
    pub base_url: Option<String>,

    /// Response cache window in seconds; 0 disables the cache
    pub cache_ttl_secs: Option<u64>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    /// OpenAI key, used for both STT and TTS
    pub openai: Option<String>,
}

impl SenseConfigFile {
    /// Load the file at `path`, or defaults when it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let parsed = toml::from_str(&text)?;
        tracing::debug!(path = %path.display(), "config file loaded");
        Ok(parsed)
    }
}
