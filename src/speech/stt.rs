//! Speech-to-text client

use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Transcription endpoint
const STT_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Response from the transcription API
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes WAV audio to text through the hosted STT service
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl SpeechToText {
    /// Create a transcription client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("STT API key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
        })
    }

    /// Transcribe one utterance
    ///
    /// # Arguments
    ///
    /// * `wav` - 16-bit mono WAV bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recognition`] if the request fails, the service
    /// rejects it, or the response is malformed
    pub async fn transcribe(&self, wav: &[u8]) -> Result<String> {
        tracing::debug!(wav_bytes = wav.len(), "transcribing utterance");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav.to_vec())
                    .file_name("utterance.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Recognition(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post(STT_URL)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "STT request failed");
                Error::Recognition(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "STT API error");
            return Err(Error::Recognition(format!("STT error {status}: {body}")));
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Error::Recognition(format!("malformed STT response: {e}")))?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}
