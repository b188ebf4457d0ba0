//! Voice command integration tests
//!
//! Drives the listener and guided selection against scripted speech
//! components, without microphone hardware.

use std::sync::{Arc, Mutex};

use sense_gateway::speech::Announcer;
use sense_gateway::voice::{
    CommandTarget, GuidedSelection, ListenerState, Navigator, TargetProvider,
    VoiceCommand, VoiceCommandListener,
};
use sense_gateway::{Error, Result};

mod common;

use common::{RecordingAnnouncer, ScriptedRecognizer};

/// Provider exposing five numbered targets, recording activations and
/// snapshot rebuilds
struct PageTargets {
    snapshots: Mutex<usize>,
    activations: Arc<Mutex<Vec<String>>>,
}

impl PageTargets {
    fn new() -> (Arc<Self>, Arc<Mutex<Vec<String>>>) {
        let activations = Arc::new(Mutex::new(Vec::new()));
        (
            Arc::new(Self {
                snapshots: Mutex::new(0),
                activations: Arc::clone(&activations),
            }),
            activations,
        )
    }

    fn snapshot_count(&self) -> usize {
        *self.snapshots.lock().unwrap()
    }
}

impl TargetProvider for PageTargets {
    fn snapshot(&self) -> Vec<CommandTarget> {
        *self.snapshots.lock().unwrap() += 1;
        ["notes", "flashcards", "quiz", "courses", "dashboard"]
            .iter()
            .map(|id| {
                let activations = Arc::clone(&self.activations);
                let id = (*id).to_string();
                let log_id = id.clone();
                CommandTarget::new(id, move || {
                    activations.lock().unwrap().push(log_id.clone());
                })
            })
            .collect()
    }
}

#[derive(Default)]
struct HistoryNavigator {
    moves: Mutex<Vec<&'static str>>,
}

impl Navigator for HistoryNavigator {
    fn back(&self) {
        self.moves.lock().unwrap().push("back");
    }

    fn forward(&self) {
        self.moves.lock().unwrap().push("forward");
    }
}

#[tokio::test]
async fn spoken_two_activates_the_second_target_only() {
    let (provider, activations) = PageTargets::new();
    let mut listener = VoiceCommandListener::new(
        ScriptedRecognizer::new(vec![Ok("2".to_string())]),
        provider,
        Arc::new(HistoryNavigator::default()),
    );

    let report = listener.run_session().await;

    assert_eq!(report.command, VoiceCommand::Select(2));
    assert_eq!(report.registry_len, 5);
    assert_eq!(activations.lock().unwrap().as_slice(), &["flashcards"]);
}

#[tokio::test]
async fn out_of_range_number_is_unrecognized_without_panicking() {
    let (provider, activations) = PageTargets::new();
    let mut listener = VoiceCommandListener::new(
        ScriptedRecognizer::new(vec![Ok("7".to_string())]),
        provider,
        Arc::new(HistoryNavigator::default()),
    );

    let report = listener.run_session().await;

    assert_eq!(report.command, VoiceCommand::Unrecognized);
    assert!(activations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn navigation_commands_reach_the_navigator() {
    let (provider, _) = PageTargets::new();
    let navigator = Arc::new(HistoryNavigator::default());
    let mut listener = VoiceCommandListener::new(
        ScriptedRecognizer::new(vec![
            Ok("go back".to_string()),
            Ok("forward please".to_string()),
        ]),
        provider,
        Arc::clone(&navigator) as Arc<dyn Navigator>,
    );

    listener.run_session().await;
    listener.run_session().await;

    assert_eq!(
        navigator.moves.lock().unwrap().as_slice(),
        &["back", "forward"]
    );
}

#[tokio::test]
async fn every_recognition_error_is_followed_by_a_restart() {
    let (provider, _) = PageTargets::new();
    let mut listener = VoiceCommandListener::new(
        ScriptedRecognizer::new(vec![
            Err(Error::Recognition("permission denied".to_string())),
            Err(Error::Recognition("no speech detected".to_string())),
            Ok("1".to_string()),
        ]),
        Arc::clone(&provider) as Arc<dyn TargetProvider>,
        Arc::new(HistoryNavigator::default()),
    );

    for _ in 0..3 {
        listener.run_session().await;
        assert_eq!(listener.state(), ListenerState::Idle);
    }

    // Two errors, two restarts, and every session rebuilt the registry
    assert_eq!(listener.error_restarts(), 2);
    assert_eq!(listener.sessions_started(), 3);
    assert_eq!(provider.snapshot_count(), 3);
}

#[tokio::test]
async fn guided_selection_reprompts_until_a_vocabulary_match() {
    let announcer = RecordingAnnouncer::new();
    let flow = GuidedSelection::impairment_profiles(
        Arc::clone(&announcer) as Arc<dyn Announcer>,
        ScriptedRecognizer::new(vec![
            Ok("ordering a pizza".to_string()),
            Err(Error::Recognition("no speech detected".to_string())),
            Ok("I think astigmatism".to_string()),
        ]),
    );

    let selected = flow.select().await.unwrap();
    assert_eq!(selected, "astigmatism");

    let spoken = announcer.spoken();
    // Initial prompt, two retries, one confirmation
    assert_eq!(spoken.len(), 4);
    assert!(spoken[0].contains("select your vision impairment"));
    assert!(spoken[3].contains("astigmatism"));
}

#[tokio::test]
async fn guided_selection_gives_up_after_its_attempt_budget() {
    let announcer = RecordingAnnouncer::new();
    let flow = GuidedSelection::impairment_profiles(
        Arc::clone(&announcer) as Arc<dyn Announcer>,
        ScriptedRecognizer::new(vec![]),
    )
    .with_max_attempts(3);

    let result: Result<String> = flow.select().await;
    assert!(matches!(result, Err(Error::Recognition(_))));
    assert_eq!(announcer.spoken().len(), 3);
}
