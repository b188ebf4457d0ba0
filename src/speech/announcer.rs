//! Serialized speech announcements
//!
//! The platform speech channel is one process-wide resource: every
//! announcement queues behind the one before it and never interrupts.
//! Completion of the returned future is the completion signal callers
//! sequence on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::audio::{AudioPlayback, decode_mp3};
use crate::speech::TextToSpeech;
use crate::{Error, Result};

/// Floor for the per-utterance deadline
const SPEAK_DEADLINE_BASE: Duration = Duration::from_secs(10);

/// Deadline allowance per character of input text
const SPEAK_DEADLINE_PER_CHAR: Duration = Duration::from_millis(120);

/// Speaks text aloud
///
/// Injectable so flows that sequence on speech completion can be tested
/// against a fake without a real synthesis service.
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Speak the text, resolving once the utterance has finished
    ///
    /// # Errors
    ///
    /// Returns [`Error::Synthesis`] if synthesis or playback fails
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Produces speech audio for an announcement
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Render text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Synthesis`] on service failure
    async fn render(&self, text: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl Synthesizer for TextToSpeech {
    async fn render(&self, text: &str) -> Result<Vec<u8>> {
        self.synthesize(text).await
    }
}

/// The production announcer: hosted TTS, speaker playback, one FIFO gate
pub struct SpeechAnnouncer {
    synth: Arc<dyn Synthesizer>,
    gate: Mutex<()>,
}

impl SpeechAnnouncer {
    /// Create an announcer over the given synthesizer
    #[must_use]
    pub fn new(synth: Arc<dyn Synthesizer>) -> Self {
        Self {
            synth,
            gate: Mutex::new(()),
        }
    }

    /// Deadline for one utterance, scaled to its length
    fn deadline(text: &str) -> Duration {
        SPEAK_DEADLINE_BASE + SPEAK_DEADLINE_PER_CHAR * u32::try_from(text.len()).unwrap_or(u32::MAX)
    }

    /// Synthesize and play one utterance
    async fn render_and_play(&self, text: &str) -> Result<()> {
        let audio = self.synth.render(text).await?;
        let samples = decode_mp3(&audio).map_err(|e| Error::Synthesis(e.to_string()))?;
        if samples.is_empty() {
            return Ok(());
        }

        AudioPlayback::new()
            .map_err(|e| Error::Synthesis(e.to_string()))?
            .play(&samples)
            .await
            .map_err(|e| Error::Synthesis(e.to_string()))
    }
}

#[async_trait]
impl Announcer for SpeechAnnouncer {
    async fn speak(&self, text: &str) -> Result<()> {
        // FIFO: a second call enqueues here until the first finishes
        let _turn = self.gate.lock().await;

        tracing::debug!(chars = text.len(), "announcing");
        match tokio::time::timeout(Self::deadline(text), self.render_and_play(text)).await {
            Ok(result) => result,
            Err(_) => {
                // A stalled synthesis must not hang flows sequenced on
                // completion; convert it into an error instead
                tracing::warn!(chars = text.len(), "announcement deadline elapsed");
                Err(Error::Synthesis("utterance deadline elapsed".to_string()))
            }
        }
    }
}
