//! Sense Gateway - accessible study content and voice command gateway
//!
//! This library provides the core functionality for the Sense gateway:
//! - Concurrent study content generation (notes, flashcards, quiz) with
//!   one consolidated loading/error state and staleness discard
//! - Morse transcoding and timed tactile/audio rendering
//! - An always-listening voice command loop over numbered page targets
//! - Serialized speech announcements with a completion signal
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Page-level consumer                  │
//! │   targets  │  navigation  │  rendered study text    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Sense Gateway                       │
//! │  Orchestrator │ Morse │ Announcer │ Command Listener│
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │             External services/devices                │
//! │   Generation API │ STT │ TTS │ mic/speaker/vibration│
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod audio;
pub mod config;
pub mod content;
pub mod error;
pub mod morse;
pub mod speech;
pub mod voice;

pub use config::Config;
pub use content::{
    ConsolidatedContent, ContentOrchestrator, CourseDescriptor, Flashcard,
    GenerationBackend, GenerationClient, QuizQuestion, ResponseCache, TaskKind,
};
pub use error::{Error, Result};
pub use morse::{MorseOutput, MorsePattern, MorseSymbol, decode, encode, pattern_duration};
pub use speech::{
    Announcer, MicRecognizer, Recognizer, SpeechAnnouncer, SpeechToText, TextToSpeech,
};
pub use voice::{
    CommandTarget, GuidedSelection, Navigator, TargetProvider, TargetRegistry,
    VoiceCommand, VoiceCommandListener,
};
