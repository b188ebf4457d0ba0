//! Study content generation and assembly
//!
//! A course descriptor fans out into three concurrent generation tasks
//! (notes, flashcards, quiz) against the external generation API. Results
//! are committed atomically into one consolidated state, guarded against
//! staleness when the active course changes mid-flight.

mod cache;
mod client;
mod orchestrator;
mod types;

pub use cache::ResponseCache;
pub use client::{GenerationBackend, GenerationClient, GenerationRequest, TaskResponse};
pub use orchestrator::ContentOrchestrator;
pub use types::{ConsolidatedContent, CourseDescriptor, Flashcard, QuizQuestion, TaskKind};
