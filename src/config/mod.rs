//! Configuration management for the Sense gateway

pub mod file;

use std::path::PathBuf;

use crate::Result;
use file::SenseConfigFile;

/// Default generation service URL
const DEFAULT_GENERATOR_URL: &str = "http://localhost:8000";

/// Default response cache window (30 minutes)
const DEFAULT_CACHE_TTL_SECS: u64 = 1800;

/// Sense gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Vision impairment profile, read once at startup
    pub impairment: Option<String>,

    /// Content generation service
    pub generator: GeneratorConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Generation service configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Service base URL
    pub base_url: String,

    /// Response cache window in seconds; 0 disables the cache
    pub cache_ttl_secs: u64,
}

/// Voice configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Whether voice input/output is enabled
    pub enabled: bool,

    /// STT model identifier
    pub stt_model: String,

    /// TTS model identifier
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier
    pub tts_speed: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// API keys for external services
///
/// Stored as plain strings here; call sites wrap them in
/// `secrecy::SecretString` when constructing clients.
#[derive(Clone, Default)]
pub struct ApiKeys {
    /// OpenAI key (STT and TTS)
    pub openai: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("openai", &self.openai.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl Config {
    /// Load configuration: defaults, then the config file, then
    /// environment variables
    ///
    /// Environment: `SENSE_GENERATOR_URL`, `SENSE_IMPAIRMENT`,
    /// `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be parsed
    pub fn load() -> Result<Self> {
        let file = SenseConfigFile::load(&Self::config_path())?;
        Ok(Self::from_file(file).apply_env())
    }

    /// Default config file location (`~/.config/sense/config.toml`)
    #[must_use]
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "sense", "sense")
            .map_or_else(|| PathBuf::from("config.toml"), |dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay a parsed config file onto the defaults
    fn from_file(file: SenseConfigFile) -> Self {
        let defaults = VoiceConfig::default();
        Self {
            impairment: file.impairment,
            generator: GeneratorConfig {
                base_url: file
                    .generator
                    .base_url
                    .unwrap_or_else(|| DEFAULT_GENERATOR_URL.to_string()),
                cache_ttl_secs: file
                    .generator
                    .cache_ttl_secs
                    .unwrap_or(DEFAULT_CACHE_TTL_SECS),
            },
            voice: VoiceConfig {
                enabled: file.voice.enabled.unwrap_or(defaults.enabled),
                stt_model: file.voice.stt_model.unwrap_or(defaults.stt_model),
                tts_model: file.voice.tts_model.unwrap_or(defaults.tts_model),
                tts_voice: file.voice.tts_voice.unwrap_or(defaults.tts_voice),
                tts_speed: file.voice.tts_speed.unwrap_or(defaults.tts_speed),
            },
            api_keys: ApiKeys {
                openai: file.api_keys.openai,
            },
        }
    }

    /// Apply environment variable overrides
    fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("SENSE_GENERATOR_URL") {
            self.generator.base_url = url;
        }
        if let Ok(impairment) = std::env::var("SENSE_IMPAIRMENT") {
            self.impairment = Some(impairment);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.api_keys.openai = Some(key);
        }
        self
    }
}
