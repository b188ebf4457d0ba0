//! Morse transcoding and timed output
//!
//! Text is encoded into a [`MorsePattern`] via the international Morse
//! table, then rendered over time by [`MorseOutput`] as tactile pulses
//! when the device supports them, or synthesized tones otherwise.

mod code;
mod output;

pub use code::{MorsePattern, MorseSymbol, decode, encode};
pub use output::{
    MorseOutput, PlaybackChannel, TactileSink, ToneSink, pattern_duration,
};
