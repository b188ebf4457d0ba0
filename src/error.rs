//! Error types for the Sense gateway

use thiserror::Error;

/// Result type alias for Sense operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Sense gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Content generation error (network failure, non-2xx response,
    /// malformed payload from one of the batch tasks)
    #[error("generation error: {0}")]
    Generation(String),

    /// Speech recognition error (no microphone, no speech detected,
    /// transient engine fault)
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Speech synthesis error
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// A Morse playback was requested while another is in progress
    #[error("morse playback already in progress")]
    PlaybackBusy,

    /// Tactile output error
    #[error("tactile error: {0}")]
    Tactile(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
