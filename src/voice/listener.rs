//! Always-listening voice command loop
//!
//! An explicit state machine drives recognition sessions: each session
//! rebuilds the target registry, runs one recognition attempt, dispatches
//! the classified command, and restarts. Recognition errors are never
//! fatal; the loop logs and starts the next session.

use std::sync::Arc;

use crate::speech::Recognizer;
use crate::voice::{
    TargetProvider, TargetRegistry, VoiceCommand, parse_command, registry::Navigator,
};

/// Listener lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// Between sessions
    Idle,
    /// A recognition session is running
    Listening,
    /// A recognized utterance is being classified and dispatched
    Dispatching,
}

/// What one session did, for tests and diagnostics
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// The command the session dispatched
    pub command: VoiceCommand,
    /// Registry size the session was numbered against
    pub registry_len: usize,
    /// The recognition error that ended the session, if any
    pub recognition_error: Option<String>,
}

/// Continuously-restarting voice command listener
///
/// Holds `&mut self` across a session, so at most one session can ever
/// be active per listener. The listener never stops voluntarily; its
/// lifetime is the hosting page's lifetime.
pub struct VoiceCommandListener {
    recognizer: Arc<dyn Recognizer>,
    provider: Arc<dyn TargetProvider>,
    navigator: Arc<dyn Navigator>,
    state: ListenerState,
    sessions_started: u64,
    error_restarts: u64,
}

impl VoiceCommandListener {
    /// Create a listener over its collaborators
    #[must_use]
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        provider: Arc<dyn TargetProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            recognizer,
            provider,
            navigator,
            state: ListenerState::Idle,
            sessions_started: 0,
            error_restarts: 0,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> ListenerState {
        self.state
    }

    /// Sessions started so far, restarts included
    #[must_use]
    pub const fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// Sessions that ended in a recognition error
    #[must_use]
    pub const fn error_restarts(&self) -> u64 {
        self.error_restarts
    }

    /// Listen forever
    ///
    /// Every session end, normal or errored, flows into the next
    /// session start.
    pub async fn run(&mut self) {
        loop {
            self.run_session().await;
        }
    }

    /// Run exactly one session: rebuild the registry, recognize once,
    /// dispatch, and return to idle
    pub async fn run_session(&mut self) -> SessionReport {
        // The registry is a point-in-time snapshot; a changed page is
        // picked up by the next session, never mid-session
        let registry = TargetRegistry::from_provider(self.provider.as_ref());
        self.sessions_started += 1;
        self.state = ListenerState::Listening;
        tracing::debug!(
            session = self.sessions_started,
            targets = registry.len(),
            "listening"
        );

        let report = match self.recognizer.recognize().await {
            Ok(transcript) => {
                self.state = ListenerState::Dispatching;
                let command = parse_command(&transcript, registry.len());
                tracing::info!(transcript = %transcript, ?command, "utterance classified");
                self.dispatch(&command, &registry);
                SessionReport {
                    command,
                    registry_len: registry.len(),
                    recognition_error: None,
                }
            }
            Err(e) => {
                // Never fatal: voice control is supplementary, so the
                // loop restarts instead of surfacing an error
                self.error_restarts += 1;
                tracing::warn!(error = %e, "recognition session failed; restarting");
                SessionReport {
                    command: VoiceCommand::Unrecognized,
                    registry_len: registry.len(),
                    recognition_error: Some(e.to_string()),
                }
            }
        };

        self.state = ListenerState::Idle;
        report
    }

    /// Carry out a classified command
    fn dispatch(&self, command: &VoiceCommand, registry: &TargetRegistry) {
        match command {
            VoiceCommand::Select(n) => {
                if let Some(target) = registry.get(*n) {
                    tracing::info!(number = n, target = target.id(), "activating target");
                    target.activate();
                }
            }
            VoiceCommand::Back => self.navigator.back(),
            VoiceCommand::Forward => self.navigator.forward(),
            VoiceCommand::Phrase(_) | VoiceCommand::Unrecognized => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::CommandTarget;
    use crate::{Error, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Recognizer that replays a scripted sequence of results
    struct ScriptedRecognizer {
        script: Mutex<Vec<Result<String>>>,
    }

    impl ScriptedRecognizer {
        fn new(script: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
            })
        }
    }

    #[async_trait]
    impl Recognizer for ScriptedRecognizer {
        async fn recognize(&self) -> Result<String> {
            self.script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(Error::Recognition("script exhausted".to_string())))
        }
    }

    struct CountingProvider {
        snapshots: AtomicUsize,
        activations: Arc<Mutex<Vec<String>>>,
        target_count: usize,
    }

    impl TargetProvider for CountingProvider {
        fn snapshot(&self) -> Vec<CommandTarget> {
            self.snapshots.fetch_add(1, Ordering::SeqCst);
            (1..=self.target_count)
                .map(|i| {
                    let activations = Arc::clone(&self.activations);
                    let id = format!("target-{i}");
                    let log_id = id.clone();
                    CommandTarget::new(id, move || {
                        activations.lock().unwrap().push(log_id.clone());
                    })
                })
                .collect()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        moves: Mutex<Vec<&'static str>>,
    }

    impl Navigator for RecordingNavigator {
        fn back(&self) {
            self.moves.lock().unwrap().push("back");
        }

        fn forward(&self) {
            self.moves.lock().unwrap().push("forward");
        }
    }

    fn listener(
        script: Vec<Result<String>>,
        target_count: usize,
    ) -> (VoiceCommandListener, Arc<Mutex<Vec<String>>>, Arc<CountingProvider>) {
        let activations = Arc::new(Mutex::new(Vec::new()));
        let provider = Arc::new(CountingProvider {
            snapshots: AtomicUsize::new(0),
            activations: Arc::clone(&activations),
            target_count,
        });
        let listener = VoiceCommandListener::new(
            ScriptedRecognizer::new(script),
            Arc::clone(&provider) as Arc<dyn TargetProvider>,
            Arc::new(RecordingNavigator::default()),
        );
        (listener, activations, provider)
    }

    #[tokio::test]
    async fn numeric_utterance_activates_only_that_target() {
        let (mut listener, activations, _) = listener(vec![Ok("2".to_string())], 5);

        let report = listener.run_session().await;

        assert_eq!(report.command, VoiceCommand::Select(2));
        assert_eq!(activations.lock().unwrap().as_slice(), &["target-2"]);
    }

    #[tokio::test]
    async fn out_of_range_number_is_a_noop() {
        let (mut listener, activations, _) = listener(vec![Ok("7".to_string())], 5);

        let report = listener.run_session().await;

        assert_eq!(report.command, VoiceCommand::Unrecognized);
        assert!(activations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_session_restarts_with_fresh_registry() {
        let (mut listener, _, provider) = listener(
            vec![
                Ok("1".to_string()),
                Err(Error::Recognition("microphone denied".to_string())),
            ],
            3,
        );

        // Script pops from the back: error first, then success
        let errored = listener.run_session().await;
        assert!(errored.recognition_error.is_some());
        assert_eq!(listener.error_restarts(), 1);

        let recovered = listener.run_session().await;
        assert!(recovered.recognition_error.is_none());
        assert_eq!(listener.sessions_started(), 2);

        // Each session took its own snapshot
        assert_eq!(provider.snapshots.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn state_returns_to_idle_between_sessions() {
        let (mut listener, _, _) = listener(vec![Ok("back".to_string())], 2);
        assert_eq!(listener.state(), ListenerState::Idle);

        listener.run_session().await;
        assert_eq!(listener.state(), ListenerState::Idle);
    }
}
