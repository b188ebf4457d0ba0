//! Utterance endpointing
//!
//! Slices a continuous microphone stream into single utterances using
//! RMS energy: capture begins when energy crosses the speech threshold
//! and the utterance completes after enough trailing silence.

/// Minimum RMS energy to count as speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum utterance length to accept (0.3s at 16kHz)
const MIN_UTTERANCE_SAMPLES: usize = 4800;

/// Trailing silence that ends an utterance (0.5s at 16kHz)
const TRAILING_SILENCE_SAMPLES: usize = 8000;

/// Segmentation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No speech heard yet
    Waiting,
    /// Speech started, accumulating
    Capturing,
}

/// Accumulates microphone chunks into one endpointed utterance
#[derive(Debug)]
pub struct UtteranceSegmenter {
    phase: Phase,
    utterance: Vec<f32>,
    silence_run: usize,
}

impl Default for UtteranceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceSegmenter {
    /// Create a segmenter waiting for speech
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Waiting,
            utterance: Vec::new(),
            silence_run: 0,
        }
    }

    /// Feed one chunk of samples
    ///
    /// Returns true once a complete utterance is available via
    /// [`Self::take_utterance`].
    pub fn push(&mut self, samples: &[f32]) -> bool {
        let speaking = rms_energy(samples) > ENERGY_THRESHOLD;

        match self.phase {
            Phase::Waiting => {
                if speaking {
                    self.phase = Phase::Capturing;
                    self.utterance.extend_from_slice(samples);
                    self.silence_run = 0;
                    tracing::trace!("speech onset");
                }
            }
            Phase::Capturing => {
                self.utterance.extend_from_slice(samples);
                if speaking {
                    self.silence_run = 0;
                } else {
                    self.silence_run += samples.len();
                }

                if self.silence_run > TRAILING_SILENCE_SAMPLES {
                    // Judge length on the voiced part, not the trailing silence
                    if self.utterance.len() - self.silence_run > MIN_UTTERANCE_SAMPLES {
                        tracing::debug!(
                            samples = self.utterance.len(),
                            "utterance complete"
                        );
                        return true;
                    }
                    // Too short to be speech; keep waiting
                    self.reset();
                }
            }
        }

        false
    }

    /// Whether speech has started and the utterance is still open
    #[must_use]
    pub fn in_speech(&self) -> bool {
        self.phase == Phase::Capturing
    }

    /// Take the accumulated utterance, resetting for the next one
    pub fn take_utterance(&mut self) -> Vec<f32> {
        let utterance = std::mem::take(&mut self.utterance);
        self.reset();
        utterance
    }

    /// Discard progress and wait for speech again
    pub fn reset(&mut self) {
        self.phase = Phase::Waiting;
        self.utterance.clear();
        self.silence_run = 0;
    }
}

/// RMS energy of a sample chunk
#[allow(clippy::cast_precision_loss)]
fn rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
