//! Audio device access
//!
//! Microphone capture toward the recognizer and speaker playback for
//! synthesized speech and Morse tones, both via cpal.

mod capture;
mod playback;

pub use capture::{AudioCapture, CAPTURE_SAMPLE_RATE, samples_to_wav};
pub use playback::{AudioPlayback, CpalToneSink, synth_sine};

pub(crate) use playback::decode_mp3;
