//! Course and study content types

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifies a course to generate content for
///
/// Equality over `(name, topics)` is the course identity used for
/// staleness detection: an in-flight batch whose descriptor no longer
/// matches the active one is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseDescriptor {
    /// Course name, also used as the generation subject
    pub name: String,
    /// Ordered lesson topics
    pub topics: Vec<String>,
}

impl CourseDescriptor {
    /// Create a descriptor from a name and topics
    #[must_use]
    pub fn new(name: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            name: name.into(),
            topics,
        }
    }
}

/// The three generation tasks issued together for one course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Markdown lesson notes (wire name `content`)
    #[serde(rename = "content")]
    Notes,
    /// Question/answer flashcards
    Flashcards,
    /// Multiple-choice quiz
    Quiz,
}

impl TaskKind {
    /// Wire name used by the generation API
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "content",
            Self::Flashcards => "flashcards",
            Self::Quiz => "quiz",
        }
    }
}

/// A single question/answer flashcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Front of the card
    pub question: String,
    /// Back of the card
    pub answer: String,
}

/// A multiple-choice quiz question
///
/// The wire form carries the correct option as a letter (`A`..); it is
/// converted to a zero-based index at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    /// Question text
    pub question: String,
    /// Answer options, in display order
    pub options: Vec<String>,
    /// Zero-based index of the correct option
    pub correct_index: usize,
}

/// Quiz question as the generation API returns it
#[derive(Debug, Deserialize)]
pub(crate) struct QuizQuestionWire {
    question: String,
    options: Vec<String>,
    correct_answer: String,
}

impl TryFrom<QuizQuestionWire> for QuizQuestion {
    type Error = Error;

    fn try_from(wire: QuizQuestionWire) -> Result<Self> {
        let letter = wire
            .correct_answer
            .trim()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| Error::Generation("quiz answer letter missing".to_string()))?;

        if !letter.is_ascii_uppercase() {
            return Err(Error::Generation(format!(
                "quiz answer '{letter}' is not a letter"
            )));
        }

        let correct_index = (letter as u8 - b'A') as usize;
        if correct_index >= wire.options.len() {
            return Err(Error::Generation(format!(
                "quiz answer '{letter}' out of range for {} options",
                wire.options.len()
            )));
        }

        Ok(Self {
            question: wire.question,
            options: wire.options,
            correct_index,
        })
    }
}

/// The assembled study material for one course
///
/// Owned exclusively by the orchestrator and published atomically:
/// consumers never observe a partially-committed batch. `is_loading`
/// transitions true to false exactly once per course activation, after
/// all three tasks settle. On batch failure the content fields stay at
/// their defaults and `error` carries the surfaced failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedContent {
    /// Markdown lesson notes
    pub notes: String,
    /// Flashcards for review
    pub flashcards: Vec<Flashcard>,
    /// Quiz questions
    pub quiz: Vec<QuizQuestion>,
    /// Whether a batch for the active course is still in flight
    pub is_loading: bool,
    /// Failure surfaced from the last settled batch, if any
    pub error: Option<String>,
}

impl ConsolidatedContent {
    /// The empty loading state published when a course activates
    #[must_use]
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }
}
