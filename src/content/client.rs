//! Generation API client
//!
//! Thin request/response contract around the external content-generation
//! service. Each task returns a `raw` payload string: markdown for notes,
//! a JSON-encoded array for flashcards and quiz.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::content::types::QuizQuestionWire;
use crate::content::{CourseDescriptor, Flashcard, QuizQuestion, TaskKind};
use crate::{Error, Result};

/// A single generation task request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Course subject
    pub subject: String,
    /// Lesson name (the API expects it alongside the subject)
    pub lesson_name: String,
    /// Ordered lesson topics
    pub topics: Vec<String>,
    /// Which of the three tasks to generate
    pub task_type: TaskKind,
}

impl GenerationRequest {
    /// Build the request for one task of a course batch
    #[must_use]
    pub fn for_course(course: &CourseDescriptor, kind: TaskKind) -> Self {
        Self {
            subject: course.name.clone(),
            lesson_name: course.name.clone(),
            topics: course.topics.clone(),
            task_type: kind,
        }
    }
}

/// Generation API response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResponse {
    /// Echoed task type
    pub task_type: String,
    /// Per-task payload blocks; exactly one is populated
    pub result: TaskResult,
}

/// Payload blocks keyed by task type
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    content: Option<RawBlock>,
    #[serde(default)]
    flashcards: Option<RawBlock>,
    #[serde(default)]
    quiz: Option<RawBlock>,
}

/// A raw payload string as the generator emits it
#[derive(Debug, Clone, Deserialize)]
struct RawBlock {
    raw: String,
}

impl TaskResponse {
    /// Extract the markdown notes payload
    ///
    /// # Errors
    ///
    /// Returns error if the response has no `content` block
    pub fn into_notes(self) -> Result<String> {
        self.result
            .content
            .map(|block| block.raw)
            .ok_or_else(|| Error::Generation("notes payload missing".to_string()))
    }

    /// Extract and decode the flashcards payload
    ///
    /// # Errors
    ///
    /// Returns error if the block is missing or its `raw` string is not a
    /// JSON array of question/answer objects
    pub fn into_flashcards(self) -> Result<Vec<Flashcard>> {
        let block = self
            .result
            .flashcards
            .ok_or_else(|| Error::Generation("flashcards payload missing".to_string()))?;

        serde_json::from_str(&block.raw)
            .map_err(|e| Error::Generation(format!("malformed flashcards payload: {e}")))
    }

    /// Extract and decode the quiz payload, converting answer letters to
    /// zero-based option indices
    ///
    /// # Errors
    ///
    /// Returns error if the block is missing, its `raw` string is not a
    /// JSON array, or an answer letter doesn't address an option
    pub fn into_quiz(self) -> Result<Vec<QuizQuestion>> {
        let block = self
            .result
            .quiz
            .ok_or_else(|| Error::Generation("quiz payload missing".to_string()))?;

        let wire: Vec<QuizQuestionWire> = serde_json::from_str(&block.raw)
            .map_err(|e| Error::Generation(format!("malformed quiz payload: {e}")))?;

        wire.into_iter().map(QuizQuestion::try_from).collect()
    }
}

/// Backend that fulfils generation requests
///
/// The HTTP client below is the production implementation; tests install
/// scripted fakes.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate one task's payload
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed
    async fn generate(&self, request: &GenerationRequest) -> Result<TaskResponse>;
}

/// HTTP client for the generation service
pub struct GenerationClient {
    client: reqwest::Client,
    base_url: String,
}

impl GenerationClient {
    /// Create a client against the given service base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GenerationBackend for GenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<TaskResponse> {
        let url = format!("{}/generate-task", self.base_url);
        tracing::debug!(
            subject = %request.subject,
            task_type = request.task_type.as_str(),
            "dispatching generation task"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, task_type = request.task_type.as_str(), "generation request failed");
                Error::Generation(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "generation API error");
            return Err(Error::Generation(format!(
                "generation API error {status}: {body}"
            )));
        }

        let task: TaskResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse generation response");
            Error::Generation(format!("malformed response: {e}"))
        })?;

        tracing::debug!(
            task_type = %task.task_type,
            "generation task complete"
        );
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> TaskResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn notes_payload_round_trip() {
        let resp = response(
            r##"{"task_type":"content","result":{"content":{"raw":"# Cells\nAll living things."}}}"##,
        );
        assert_eq!(resp.into_notes().unwrap(), "# Cells\nAll living things.");
    }

    #[test]
    fn flashcards_raw_is_double_decoded() {
        let resp = response(
            r#"{"task_type":"flashcards","result":{"flashcards":{"raw":"[{\"question\":\"What is a cell?\",\"answer\":\"The basic unit of life\"}]"}}}"#,
        );
        let cards = resp.into_flashcards().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is a cell?");
    }

    #[test]
    fn quiz_letters_become_indices() {
        let resp = response(
            r#"{"task_type":"quiz","result":{"quiz":{"raw":"[{\"question\":\"Smallest unit of life?\",\"options\":[\"A) Atom\",\"B) Cell\",\"C) Organ\",\"D) Tissue\"],\"correct_answer\":\"B\"}]"}}}"#,
        );
        let quiz = resp.into_quiz().unwrap();
        assert_eq!(quiz[0].correct_index, 1);
    }

    #[test]
    fn missing_block_is_an_error() {
        let resp = response(r#"{"task_type":"content","result":{}}"#);
        assert!(resp.into_notes().is_err());
    }

    #[test]
    fn malformed_raw_json_is_an_error() {
        let resp = response(
            r#"{"task_type":"quiz","result":{"quiz":{"raw":"not json"}}}"#,
        );
        assert!(resp.into_quiz().is_err());
    }

    #[test]
    fn request_serializes_wire_task_type() {
        let course = CourseDescriptor::new("Biology", vec!["Cells".to_string()]);
        let request = GenerationRequest::for_course(&course, TaskKind::Notes);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["task_type"], "content");
        assert_eq!(json["lesson_name"], "Biology");
    }
}
