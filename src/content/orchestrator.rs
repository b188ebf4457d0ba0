//! Content batch orchestration
//!
//! Issues the three generation tasks for a course concurrently, commits
//! their results as one atomic state update, and discards batches whose
//! course was superseded while they were in flight.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::content::{
    ConsolidatedContent, CourseDescriptor, GenerationBackend, GenerationRequest,
    ResponseCache, TaskKind, TaskResponse,
};
use crate::Result;

/// Orchestrates study content generation for the active course
///
/// Exactly one course is active at a time. Activating a new course
/// supersedes any in-flight batch: the old batch still runs to
/// completion, but its results are discarded at settlement rather than
/// merged (cancellation-by-staleness, no network abort).
pub struct ContentOrchestrator {
    backend: Arc<dyn GenerationBackend>,
    cache: Option<ResponseCache>,
    state: watch::Sender<ConsolidatedContent>,
    active: Mutex<Option<CourseDescriptor>>,
}

impl ContentOrchestrator {
    /// Create an orchestrator over the given backend
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        let (state, _) = watch::channel(ConsolidatedContent::default());
        Self {
            backend,
            cache: None,
            state,
            active: Mutex::new(None),
        }
    }

    /// Enable the response cache
    #[must_use]
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Subscribe to consolidated state updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConsolidatedContent> {
        self.state.subscribe()
    }

    /// Consolidated state updates as an async stream
    #[must_use]
    pub fn updates(&self) -> WatchStream<ConsolidatedContent> {
        WatchStream::new(self.state.subscribe())
    }

    /// Snapshot of the current consolidated state
    #[must_use]
    pub fn current(&self) -> ConsolidatedContent {
        self.state.borrow().clone()
    }

    /// Request the content batch for a course
    ///
    /// Marks the course active, publishes the loading state, and runs the
    /// three generation tasks concurrently. At settlement:
    ///
    /// - current course still matches: the batch commits in one atomic
    ///   publish and `Ok(Some(content))` is returned;
    /// - course was superseded: the batch is discarded silently and
    ///   `Ok(None)` is returned; the superseding call owns the state;
    /// - any task failed: no partial content commits, the published state
    ///   clears `is_loading` with the error surfaced, and the error is
    ///   returned.
    ///
    /// # Errors
    ///
    /// Returns error if any of the three tasks fails while the course is
    /// still active. Failure of a superseded batch is discarded like its
    /// results.
    pub async fn request(
        &self,
        course: CourseDescriptor,
    ) -> Result<Option<ConsolidatedContent>> {
        *self.active.lock().unwrap() = Some(course.clone());
        self.state.send_replace(ConsolidatedContent::loading());
        tracing::info!(
            course = %course.name,
            topics = course.topics.len(),
            "content batch dispatched"
        );

        // Dispatch-time identity travels with the batch; completion order
        // of the three tasks is undefined.
        let (notes, flashcards, quiz) = futures::future::join3(
            self.run_task(&course, TaskKind::Notes),
            self.run_task(&course, TaskKind::Flashcards),
            self.run_task(&course, TaskKind::Quiz),
        )
        .await;

        if !self.is_current(&course) {
            tracing::debug!(course = %course.name, "stale content batch discarded");
            return Ok(None);
        }

        let outcome: Result<_> = (|| {
            Ok((
                notes?.into_notes()?,
                flashcards?.into_flashcards()?,
                quiz?.into_quiz()?,
            ))
        })();

        match outcome {
            Ok((notes, flashcards, quiz)) => {
                let content = ConsolidatedContent {
                    notes,
                    flashcards,
                    quiz,
                    is_loading: false,
                    error: None,
                };
                self.state.send_replace(content.clone());
                tracing::info!(course = %course.name, "content batch committed");
                Ok(Some(content))
            }
            Err(e) => {
                // All-or-nothing: no partial content, loading still clears
                tracing::error!(course = %course.name, error = %e, "content batch failed");
                self.state.send_replace(ConsolidatedContent {
                    error: Some(e.to_string()),
                    ..ConsolidatedContent::default()
                });
                Err(e)
            }
        }
    }

    /// Run one task, consulting the response cache around the backend
    async fn run_task(
        &self,
        course: &CourseDescriptor,
        kind: TaskKind,
    ) -> Result<TaskResponse> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(course, kind) {
                tracing::debug!(task_type = kind.as_str(), "generation cache hit");
                return Ok(hit);
            }
        }

        let request = GenerationRequest::for_course(course, kind);
        let response = self.backend.generate(&request).await?;

        if let Some(cache) = &self.cache {
            cache.put(course, kind, response.clone());
        }
        Ok(response)
    }

    /// Whether the given course is still the active one
    fn is_current(&self, course: &CourseDescriptor) -> bool {
        self.active.lock().unwrap().as_ref() == Some(course)
    }
}
