//! Voice command navigation
//!
//! A continuously-restarting listener recognizes utterances, matches
//! them against a numbered registry of on-screen targets, and dispatches
//! navigation actions. A separate guided flow prompts for one selection
//! from a fixed vocabulary.

mod command;
mod guided;
mod listener;
mod registry;

pub use command::{VoiceCommand, match_phrase, parse_command};
pub use guided::{GuidedSelection, SelectionOption};
pub use listener::{ListenerState, SessionReport, VoiceCommandListener};
pub use registry::{CommandTarget, Navigator, TargetProvider, TargetRegistry};
