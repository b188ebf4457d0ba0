//! Speech input and output
//!
//! Recognition: microphone audio is endpointed into single utterances
//! and transcribed through a hosted STT service. Synthesis: text is
//! rendered through a hosted TTS service and played back, serialized
//! through one process-wide announcer queue.

mod announcer;
mod endpoint;
mod recognizer;
mod stt;
mod tts;

pub use announcer::{Announcer, SpeechAnnouncer, Synthesizer};
pub use endpoint::UtteranceSegmenter;
pub use recognizer::{MicRecognizer, Recognizer};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
