//! Content orchestration integration tests
//!
//! Exercises the batch lifecycle against scripted backends, without a
//! real generation service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::StreamExt as _;
use sense_gateway::content::{
    ContentOrchestrator, CourseDescriptor, GenerationBackend, GenerationRequest,
    ResponseCache, TaskKind, TaskResponse,
};
use sense_gateway::{Error, Result};
use tokio::sync::watch;

mod common;

/// Well-formed payload for one task kind
fn payload(kind: TaskKind) -> TaskResponse {
    let json = match kind {
        TaskKind::Notes => {
            r##"{"task_type":"content","result":{"content":{"raw":"# Cell Theory\nAll life is cellular."}}}"##
        }
        TaskKind::Flashcards => {
            r#"{"task_type":"flashcards","result":{"flashcards":{"raw":"[{\"question\":\"What is a cell?\",\"answer\":\"The basic unit of life\"},{\"question\":\"What is DNA?\",\"answer\":\"The molecule of heredity\"}]"}}}"#
        }
        TaskKind::Quiz => {
            r#"{"task_type":"quiz","result":{"quiz":{"raw":"[{\"question\":\"Where is DNA stored?\",\"options\":[\"A) Cytoplasm\",\"B) Nucleus\",\"C) Membrane\",\"D) Ribosome\"],\"correct_answer\":\"B\"}]"}}}"#
        }
    };
    serde_json::from_str(json).unwrap()
}

/// Backend that can hold one subject's batch until released
struct GatedBackend {
    calls: AtomicUsize,
    gated_subject: String,
    release: watch::Receiver<bool>,
}

impl GatedBackend {
    fn new(gated_subject: &str) -> (Arc<Self>, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        (
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gated_subject: gated_subject.to_string(),
                release: rx,
            }),
            tx,
        )
    }
}

#[async_trait]
impl GenerationBackend for GatedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<TaskResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if request.subject == self.gated_subject {
            let mut release = self.release.clone();
            while !*release.borrow() {
                release.changed().await.expect("release sender dropped");
            }
        }

        Ok(payload(request.task_type))
    }
}

/// Backend that fails exactly one task kind
struct PartialFailureBackend {
    failing: TaskKind,
}

#[async_trait]
impl GenerationBackend for PartialFailureBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<TaskResponse> {
        if request.task_type == self.failing {
            return Err(Error::Generation("upstream 500".to_string()));
        }
        Ok(payload(request.task_type))
    }
}

fn biology() -> CourseDescriptor {
    CourseDescriptor::new(
        "Biology",
        vec!["Cells".to_string(), "Genetics".to_string()],
    )
}

#[tokio::test]
async fn successful_batch_loads_exactly_once() {
    let (backend, release) = GatedBackend::new("Biology");
    let orchestrator = Arc::new(ContentOrchestrator::new(
        Arc::clone(&backend) as Arc<dyn GenerationBackend>
    ));
    let mut updates = orchestrator.subscribe();

    let request = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.request(biology()).await })
    };

    // First update: loading state published at dispatch
    updates.changed().await.unwrap();
    {
        let state = updates.borrow_and_update();
        assert!(state.is_loading);
        assert!(state.notes.is_empty());
    }

    release.send(true).unwrap();

    // Second update: the committed batch; exactly three tasks dispatched
    updates.changed().await.unwrap();
    let state = updates.borrow_and_update().clone();
    assert!(!state.is_loading);
    assert!(!state.notes.is_empty());
    assert_eq!(state.flashcards.len(), 2);
    assert_eq!(state.quiz.len(), 1);
    assert_eq!(state.quiz[0].correct_index, 1);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 3);

    // No further transitions: loading cleared exactly once
    assert!(!updates.has_changed().unwrap());

    let returned = request.await.unwrap().unwrap().unwrap();
    assert_eq!(returned, state);
}

#[tokio::test]
async fn superseded_batch_is_discarded_even_when_it_resolves_later() {
    let (backend, release) = GatedBackend::new("Biology");
    let orchestrator = Arc::new(ContentOrchestrator::new(
        Arc::clone(&backend) as Arc<dyn GenerationBackend>
    ));

    // First course blocks in flight
    let stale = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.request(biology()).await })
    };
    tokio::task::yield_now().await;

    // Second course supersedes it and completes immediately
    let chemistry =
        CourseDescriptor::new("Chemistry", vec!["Atoms".to_string()]);
    let committed = orchestrator
        .request(chemistry)
        .await
        .unwrap()
        .expect("active course commits");
    assert!(!committed.is_loading);

    // Now let the stale batch finish; its results must be dropped
    release.send(true).unwrap();
    let stale_outcome = stale.await.unwrap().unwrap();
    assert!(stale_outcome.is_none());

    assert_eq!(orchestrator.current(), committed);
}

#[tokio::test]
async fn one_failed_task_fails_the_whole_batch() {
    let backend = Arc::new(PartialFailureBackend {
        failing: TaskKind::Quiz,
    });
    let orchestrator = ContentOrchestrator::new(backend);

    let result = orchestrator.request(biology()).await;
    assert!(matches!(result, Err(Error::Generation(_))));

    // All-or-nothing: no partial content, loading cleared, error surfaced
    let state = orchestrator.current();
    assert!(!state.is_loading);
    assert!(state.notes.is_empty());
    assert!(state.flashcards.is_empty());
    assert!(state.quiz.is_empty());
    assert!(state.error.is_some());
}

#[tokio::test]
async fn updates_stream_tracks_the_latest_state() {
    let (backend, release) = GatedBackend::new("nothing-gated");
    release.send(true).unwrap();
    let orchestrator =
        ContentOrchestrator::new(Arc::clone(&backend) as Arc<dyn GenerationBackend>);

    let mut updates = orchestrator.updates();

    // A watch-backed stream opens on the current (default) state
    let initial = updates.next().await.unwrap();
    assert!(!initial.is_loading);
    assert!(initial.notes.is_empty());

    orchestrator.request(biology()).await.unwrap();

    // Intermediate states coalesce; the next item is the settled batch
    let settled = updates.next().await.unwrap();
    assert!(!settled.is_loading);
    assert!(!settled.notes.is_empty());
}

#[tokio::test]
async fn cache_deduplicates_within_window() {
    let (backend, release) = GatedBackend::new("nothing-gated");
    release.send(true).unwrap();

    let orchestrator = ContentOrchestrator::new(
        Arc::clone(&backend) as Arc<dyn GenerationBackend>
    )
    .with_cache(ResponseCache::default());

    orchestrator.request(biology()).await.unwrap();
    orchestrator.request(biology()).await.unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 3);

    // A different course identity misses the cache
    let other = CourseDescriptor::new("Biology", vec!["Evolution".to_string()]);
    orchestrator.request(other).await.unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 6);
}
