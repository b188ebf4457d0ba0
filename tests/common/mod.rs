//! Shared test utilities

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sense_gateway::speech::{Announcer, Recognizer};
use sense_gateway::{Error, Result};

/// Recognizer that replays a scripted sequence of session results
pub struct ScriptedRecognizer {
    script: Mutex<Vec<Result<String>>>,
}

impl ScriptedRecognizer {
    /// Results are consumed back to front; push the last session first
    #[must_use]
    pub fn new(mut script: Vec<Result<String>>) -> Arc<Self> {
        script.reverse();
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

/// Announcer that records what it is asked to speak
#[derive(Default)]
pub struct RecordingAnnouncer {
    spoken: Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything spoken so far, in order
    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
