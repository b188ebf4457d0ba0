//! Guided selection prompts
//!
//! Speaks an instruction and, on its completion, runs exactly one
//! recognition attempt restricted to a fixed option vocabulary. An
//! unmatched utterance re-prompts and retries; attempts are bounded so a
//! dead microphone surfaces as an error instead of prompting forever.

use std::sync::Arc;

use crate::speech::{Announcer, Recognizer};
use crate::voice::{VoiceCommand, match_phrase};
use crate::{Error, Result};

/// Default attempt budget before giving up
const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// One selectable option in a guided prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOption {
    /// Identifier matched against utterances (e.g. "low-vision")
    pub id: String,
    /// Spoken label (e.g. "Low Vision")
    pub label: String,
}

impl SelectionOption {
    /// Create an option
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Prompt-then-listen flow over a fixed vocabulary
pub struct GuidedSelection {
    announcer: Arc<dyn Announcer>,
    recognizer: Arc<dyn Recognizer>,
    options: Vec<SelectionOption>,
    prompt: String,
    retry_prompt: String,
    max_attempts: usize,
}

impl GuidedSelection {
    /// Create a guided flow over the given options
    #[must_use]
    pub fn new(
        announcer: Arc<dyn Announcer>,
        recognizer: Arc<dyn Recognizer>,
        options: Vec<SelectionOption>,
        prompt: impl Into<String>,
        retry_prompt: impl Into<String>,
    ) -> Self {
        Self {
            announcer,
            recognizer,
            options,
            prompt: prompt.into(),
            retry_prompt: retry_prompt.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// The vision impairment profile selector the app opens with
    #[must_use]
    pub fn impairment_profiles(
        announcer: Arc<dyn Announcer>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        let options = vec![
            SelectionOption::new("low-vision", "Low Vision"),
            SelectionOption::new("color-blindness", "Color Blindness"),
            SelectionOption::new("dyslexia", "Dyslexia"),
            SelectionOption::new("glaucoma", "Glaucoma"),
            SelectionOption::new("astigmatism", "Astigmatism"),
            SelectionOption::new("none", "No Impairment"),
        ];
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        let prompt = format!(
            "Please select your vision impairment. Options are: {}.",
            labels.join(", ")
        );
        Self::new(
            announcer,
            recognizer,
            options,
            prompt,
            "I'm sorry, I didn't catch that. Please say your selection again.",
        )
    }

    /// Override the attempt budget
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Run the flow to a selection
    ///
    /// Each attempt speaks the prompt, waits for it to finish, and runs
    /// one recognition attempt. Synthesis failures are logged and the
    /// attempt listens anyway; recognition failures and unmatched
    /// utterances re-prompt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recognition`] once the attempt budget is spent
    pub async fn select(&self) -> Result<String> {
        for attempt in 1..=self.max_attempts {
            let prompt = if attempt == 1 {
                &self.prompt
            } else {
                &self.retry_prompt
            };

            // Listening waits for prompt completion; a failed prompt
            // still listens, since speech output is supplementary
            if let Err(e) = self.announcer.speak(prompt).await {
                tracing::warn!(error = %e, "selection prompt failed");
            }

            match self.attempt().await {
                VoiceCommand::Phrase(id) => {
                    let confirmation = format!("You selected {id}.");
                    if let Err(e) = self.announcer.speak(&confirmation).await {
                        tracing::warn!(error = %e, "selection confirmation failed");
                    }
                    return Ok(id);
                }
                _ => tracing::debug!(attempt, "no option matched; re-prompting"),
            }
        }

        Err(Error::Recognition(format!(
            "no selection after {} attempts",
            self.max_attempts
        )))
    }

    /// Run exactly one restricted-vocabulary recognition attempt
    async fn attempt(&self) -> VoiceCommand {
        match self.recognizer.recognize().await {
            Ok(transcript) => {
                let ids: Vec<String> = self.options.iter().map(|o| o.id.clone()).collect();
                match_phrase(&transcript, &ids).map_or(VoiceCommand::Unrecognized, |id| {
                    VoiceCommand::Phrase(id.to_string())
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "selection attempt failed");
                VoiceCommand::Unrecognized
            }
        }
    }
}
