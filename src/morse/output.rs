//! Timed Morse rendering with device-capability fallback
//!
//! Plays a [`MorsePattern`] one symbol at a time: a tactile pulse when the
//! host exposes a vibration device, a sine tone otherwise. Symbols never
//! overlap; the channel is sampled once per playback and fixed for the
//! whole run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::morse::{MorsePattern, MorseSymbol};
use crate::{Error, Result};

/// Dot pulse length
const DOT: Duration = Duration::from_millis(100);

/// Dash pulse length
const DASH: Duration = Duration::from_millis(300);

/// Silent tick following every symbol
const TICK: Duration = Duration::from_millis(200);

/// Tone frequency for dots
const DOT_HZ: f32 = 1200.0;

/// Tone frequency for dashes
const DASH_HZ: f32 = 800.0;

/// Device vibration capability
///
/// Hosts without a vibration device simply don't install a sink, which
/// forces the audio fallback.
#[async_trait]
pub trait TactileSink: Send + Sync {
    /// Whether the device can vibrate right now
    fn available(&self) -> bool;

    /// Vibrate for the given duration, returning once the pulse ends
    ///
    /// # Errors
    ///
    /// Returns error if the device rejects the pulse
    async fn pulse(&self, duration: Duration) -> Result<()>;
}

/// Synthesized tone output
#[async_trait]
pub trait ToneSink: Send + Sync {
    /// Play a sine tone at `frequency` for `duration`, returning once
    /// the tone ends
    ///
    /// # Errors
    ///
    /// Returns error if audio output fails
    async fn tone(&self, frequency: f32, duration: Duration) -> Result<()>;
}

/// Output channel chosen for one playback run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChannel {
    /// Vibration pulses
    Tactile,
    /// Sine tones through the speakers
    Tone,
}

/// Total playback time for a pattern
///
/// A pure function of the symbol sequence; the channel never changes it.
/// Pulses cost their length plus one tick, a letter gap one extra tick,
/// a word gap three.
#[must_use]
pub fn pattern_duration(pattern: &MorsePattern) -> Duration {
    pattern
        .symbols()
        .iter()
        .map(|symbol| match symbol {
            MorseSymbol::Dot => DOT + TICK,
            MorseSymbol::Dash => DASH + TICK,
            MorseSymbol::LetterGap => TICK,
            MorseSymbol::WordGap => 3 * TICK,
        })
        .sum()
}

/// Renders Morse patterns over time
pub struct MorseOutput {
    tactile: Option<Arc<dyn TactileSink>>,
    tone: Arc<dyn ToneSink>,
    busy: AtomicBool,
}

impl MorseOutput {
    /// Create an output engine over the given sinks
    #[must_use]
    pub fn new(tone: Arc<dyn ToneSink>, tactile: Option<Arc<dyn TactileSink>>) -> Self {
        Self {
            tactile,
            tone,
            busy: AtomicBool::new(false),
        }
    }

    /// Sample which channel a playback starting now would use
    #[must_use]
    pub fn sample_channel(&self) -> PlaybackChannel {
        match &self.tactile {
            Some(sink) if sink.available() => PlaybackChannel::Tactile,
            _ => PlaybackChannel::Tone,
        }
    }

    /// Whether a playback is currently in progress
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Play a pattern to completion
    ///
    /// Strictly sequential: each symbol's pulse and trailing pause elapse
    /// before the next symbol starts. The tactile/tone choice is made once
    /// at entry and holds for the whole pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaybackBusy`] if another playback is in progress,
    /// or the sink error if a pulse fails.
    pub async fn play(&self, pattern: &MorsePattern) -> Result<()> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::PlaybackBusy);
        }
        let _guard = BusyGuard { busy: &self.busy };

        let channel = self.sample_channel();
        tracing::debug!(
            symbols = pattern.len(),
            ?channel,
            total_ms = pattern_duration(pattern).as_millis(),
            "starting morse playback"
        );

        for symbol in pattern.symbols() {
            match symbol {
                MorseSymbol::Dot => self.pulse(channel, DOT, DOT_HZ).await?,
                MorseSymbol::Dash => self.pulse(channel, DASH, DASH_HZ).await?,
                MorseSymbol::LetterGap => tokio::time::sleep(TICK).await,
                MorseSymbol::WordGap => tokio::time::sleep(3 * TICK).await,
            }
        }

        tracing::debug!("morse playback complete");
        Ok(())
    }

    /// Emit one pulse on the chosen channel, then the trailing pause
    async fn pulse(
        &self,
        channel: PlaybackChannel,
        length: Duration,
        frequency: f32,
    ) -> Result<()> {
        match channel {
            PlaybackChannel::Tactile => {
                // sample_channel only picks Tactile when a sink is installed
                if let Some(sink) = &self.tactile {
                    sink.pulse(length).await?;
                }
            }
            PlaybackChannel::Tone => self.tone.tone(frequency, length).await?,
        }
        tokio::time::sleep(TICK).await;
        Ok(())
    }
}

/// Clears the busy flag when playback ends, error paths included
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
