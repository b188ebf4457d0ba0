//! Speech recognition sessions
//!
//! A [`Recognizer`] runs one recognition session to completion and
//! returns the final transcript. The production implementation listens
//! on the microphone, endpoints a single utterance, and transcribes it
//! through the hosted STT service.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::audio::{AudioCapture, CAPTURE_SAMPLE_RATE, samples_to_wav};
use crate::speech::{SpeechToText, UtteranceSegmenter};
use crate::{Error, Result};

/// Microphone polling interval
const CHUNK_POLL: Duration = Duration::from_millis(50);

/// Give up on a session if no speech starts within this window
const NO_SPEECH_TIMEOUT: Duration = Duration::from_secs(8);

/// Hard cap on one session, speech or not
const MAX_SESSION: Duration = Duration::from_secs(30);

/// Runs recognition sessions
///
/// One call is one session; callers that want continuous listening
/// restart sessions themselves. Implementations must never run two
/// sessions concurrently for the same underlying device.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Run one session to completion, returning the final transcript
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recognition`] on microphone failure, no speech
    /// within the window, or a transcription failure
    async fn recognize(&self) -> Result<String>;
}

/// Microphone-backed recognizer
pub struct MicRecognizer {
    stt: Arc<SpeechToText>,
    no_speech_timeout: Duration,
}

impl MicRecognizer {
    /// Create a recognizer over the given transcription client
    #[must_use]
    pub fn new(stt: Arc<SpeechToText>) -> Self {
        Self {
            stt,
            no_speech_timeout: NO_SPEECH_TIMEOUT,
        }
    }

    /// Override the no-speech window
    #[must_use]
    pub fn with_no_speech_timeout(mut self, timeout: Duration) -> Self {
        self.no_speech_timeout = timeout;
        self
    }

    /// Capture one endpointed utterance from the microphone
    ///
    /// The cpal stream is not sendable across threads, so the whole
    /// capture loop runs on one blocking thread.
    async fn capture_utterance(&self) -> Result<Vec<f32>> {
        let no_speech_timeout = self.no_speech_timeout;

        let join = tokio::task::spawn_blocking(move || -> Result<Vec<f32>> {
            let mut capture = AudioCapture::new()
                .map_err(|e| Error::Recognition(format!("microphone unavailable: {e}")))?;
            capture.start()?;

            let mut segmenter = UtteranceSegmenter::new();
            let started = Instant::now();

            loop {
                std::thread::sleep(CHUNK_POLL);
                let chunk = capture.drain();

                if segmenter.push(&chunk) {
                    capture.stop();
                    return Ok(segmenter.take_utterance());
                }

                if started.elapsed() > no_speech_timeout && !segmenter.in_speech() {
                    capture.stop();
                    return Err(Error::Recognition("no speech detected".to_string()));
                }

                if started.elapsed() > MAX_SESSION {
                    capture.stop();
                    return Err(Error::Recognition("session ran too long".to_string()));
                }
            }
        });

        join.await
            .map_err(|e| Error::Recognition(format!("capture task failed: {e}")))?
    }
}

#[async_trait]
impl Recognizer for MicRecognizer {
    async fn recognize(&self) -> Result<String> {
        let utterance = self.capture_utterance().await?;
        let wav = samples_to_wav(&utterance, CAPTURE_SAMPLE_RATE)
            .map_err(|e| Error::Recognition(e.to_string()))?;
        self.stt.transcribe(&wav).await
    }
}
