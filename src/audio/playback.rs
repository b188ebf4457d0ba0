//! Speaker playback and tone synthesis

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::morse::ToneSink;
use crate::{Error, Result};

/// Playback sample rate (matches the TTS service's MP3 output)
const PLAYBACK_SAMPLE_RATE: u32 = 24_000;

/// Tone amplitude, kept below full scale to avoid clipping
const TONE_AMPLITUDE: f32 = 0.6;

/// Plays audio to the default output device
pub struct AudioPlayback {
    config: StreamConfig,
}

impl AudioPlayback {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns error if no output device is present or none of its
    /// configurations supports the playback rate
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                (c.channels() == 1 || c.channels() == 2)
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable output config".to_string()))?;

        let config = supported
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "speaker output opened"
        );

        Ok(Self { config })
    }

    /// Play MP3 bytes (the TTS response format) to completion
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    #[allow(clippy::unused_async)]
    pub async fn play_mp3(&self, mp3: &[u8]) -> Result<()> {
        let samples = decode_mp3(mp3)?;
        self.play_blocking(&samples)
    }

    /// Play raw f32 samples to completion
    ///
    /// # Errors
    ///
    /// Returns error if playback fails
    #[allow(clippy::unused_async)]
    pub async fn play(&self, samples: &[f32]) -> Result<()> {
        self.play_blocking(samples)
    }

    /// Drive the output stream until every sample has been written
    fn play_blocking(&self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device".to_string()))?;

        let config = self.config.clone();
        let channels = config.channels as usize;

        let queue = Arc::new(Mutex::new((samples.to_vec(), 0usize)));
        let finished = Arc::new(Mutex::new(false));

        let queue_cb = Arc::clone(&queue);
        let finished_cb = Arc::clone(&finished);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let (samples, pos) = &mut *queue_cb.lock().unwrap();
                    for frame in data.chunks_mut(channels) {
                        let sample = if *pos < samples.len() {
                            let s = samples[*pos];
                            *pos += 1;
                            s
                        } else {
                            *finished_cb.lock().unwrap() = true;
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                |err| {
                    tracing::error!(error = %err, "speaker stream error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        let duration_ms = (samples.len() as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);
        let deadline = std::time::Instant::now() + Duration::from_millis(duration_ms + 500);

        while !*finished.lock().unwrap() {
            if std::time::Instant::now() > deadline {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }

        drop(stream);
        tracing::trace!(samples = samples.len(), "playback finished");
        Ok(())
    }
}

/// Synthesize a sine tone as f32 samples at the playback rate
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn synth_sine(frequency: f32, duration: Duration) -> Vec<f32> {
    let count = (duration.as_secs_f32() * PLAYBACK_SAMPLE_RATE as f32) as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / PLAYBACK_SAMPLE_RATE as f32;
            TONE_AMPLITUDE * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Tone output through the speakers, for the Morse engine
pub struct CpalToneSink {
    playback: AudioPlayback,
}

impl CpalToneSink {
    /// Open the default output device for tone playback
    ///
    /// # Errors
    ///
    /// Returns error if the output device cannot be opened
    pub fn new() -> Result<Self> {
        Ok(Self {
            playback: AudioPlayback::new()?,
        })
    }
}

#[async_trait]
impl ToneSink for CpalToneSink {
    async fn tone(&self, frequency: f32, duration: Duration) -> Result<()> {
        self.playback.play(&synth_sine(frequency, duration)).await
    }
}

/// Decode MP3 bytes to mono f32 samples
pub(crate) fn decode_mp3(mp3: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3));
    let mut samples = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if frame.channels == 2 {
                    samples.extend(frame.data.chunks(2).map(|pair| {
                        let left = f32::from(pair[0]) / 32768.0;
                        let right = f32::from(pair.get(1).copied().unwrap_or(pair[0])) / 32768.0;
                        f32::midpoint(left, right)
                    }));
                } else {
                    samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("mp3 decode error: {e}"))),
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_length_matches_duration() {
        let samples = synth_sine(1200.0, Duration::from_millis(100));
        assert_eq!(samples.len(), 2400); // 100ms at 24kHz
    }

    #[test]
    fn sine_starts_at_zero_crossing() {
        let samples = synth_sine(800.0, Duration::from_millis(10));
        assert!(samples[0].abs() < f32::EPSILON);
        assert!(samples.iter().all(|s| s.abs() <= TONE_AMPLITUDE));
    }
}
