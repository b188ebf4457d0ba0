//! Text-to-speech client

use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Synthesis endpoint
const TTS_URL: &str = "https://api.openai.com/v1/audio/speech";

/// Synthesizes speech audio through the hosted TTS service
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    voice: String,
    speed: f32,
}

impl TextToSpeech {
    /// Create a synthesis client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
        voice: impl Into<String>,
        speed: f32,
    ) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("TTS API key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            voice: voice.into(),
            speed,
        })
    }

    /// Synthesize text, returning MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Synthesis`] if the request fails or the service
    /// rejects it
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        tracing::debug!(chars = text.len(), voice = %self.voice, "synthesizing speech");

        let response = self
            .client
            .post(TTS_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&SpeechRequest {
                model: &self.model,
                input: text,
                voice: &self.voice,
                speed: self.speed,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "TTS request failed");
                Error::Synthesis(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "TTS API error");
            return Err(Error::Synthesis(format!("TTS error {status}: {body}")));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Synthesis(format!("truncated TTS response: {e}")))?;
        Ok(audio.to_vec())
    }
}
