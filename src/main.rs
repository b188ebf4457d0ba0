use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sense_gateway::content::ResponseCache;
use sense_gateway::morse::{self, MorseOutput};
use sense_gateway::speech::{Announcer as _, SpeechAnnouncer, SpeechToText, TextToSpeech};
use sense_gateway::voice::{CommandTarget, GuidedSelection, Navigator, TargetProvider};
use sense_gateway::{
    Config, ContentOrchestrator, CourseDescriptor, GenerationClient, MicRecognizer,
    VoiceCommandListener,
};

/// Sense - accessible study content and voice command gateway
#[derive(Parser)]
#[command(name = "sense", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the study content batch for a course
    Fetch {
        /// Course subject (e.g. "Biology")
        subject: String,
        /// Lesson topics
        #[arg(required = true)]
        topics: Vec<String>,
    },
    /// Encode text as Morse and play it
    Morse {
        /// Text to transmit
        text: String,
        /// Print the pattern and timing without playing audio
        #[arg(long)]
        dry_run: bool,
    },
    /// Speak text through the announcer
    Speak {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the speech announcer.")]
        text: String,
    },
    /// Run the guided vision impairment selection
    Select,
    /// Run the voice command loop against numbered test targets
    Listen {
        /// How many numbered targets to expose
        #[arg(short, long, default_value = "3")]
        targets: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,sense_gateway=info",
        1 => "info,sense_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Command::Fetch { subject, topics } => fetch(&config, subject, topics).await,
        Command::Morse { text, dry_run } => play_morse(&text, dry_run).await,
        Command::Speak { text } => speak(&config, &text).await,
        Command::Select => select(&config).await,
        Command::Listen { targets } => listen(&config, targets).await,
    }
}

/// Fetch and summarize one content batch
async fn fetch(config: &Config, subject: String, topics: Vec<String>) -> anyhow::Result<()> {
    let backend = Arc::new(GenerationClient::new(config.generator.base_url.as_str()));
    let mut orchestrator = ContentOrchestrator::new(backend);
    if config.generator.cache_ttl_secs > 0 {
        orchestrator =
            orchestrator.with_cache(ResponseCache::new(config.generator.cache_ttl_secs));
    }

    let course = CourseDescriptor::new(subject, topics);
    println!("Generating study content for \"{}\"...", course.name);

    let content = orchestrator
        .request(course)
        .await?
        .context("batch was superseded")?;

    println!("--- notes ({} chars) ---", content.notes.len());
    println!("{}", content.notes);
    println!("--- flashcards ({}) ---", content.flashcards.len());
    for (i, card) in content.flashcards.iter().enumerate() {
        println!("{}. {} => {}", i + 1, card.question, card.answer);
    }
    println!("--- quiz ({} questions) ---", content.quiz.len());
    for (i, question) in content.quiz.iter().enumerate() {
        println!("{}. {}", i + 1, question.question);
        for option in &question.options {
            println!("   {option}");
        }
    }
    Ok(())
}

/// Encode and transmit text as Morse
async fn play_morse(text: &str, dry_run: bool) -> anyhow::Result<()> {
    let pattern = morse::encode(text);
    let duration = morse::pattern_duration(&pattern);
    println!("{pattern}");
    println!("{} symbols, {:.1}s", pattern.len(), duration.as_secs_f32());

    if dry_run {
        return Ok(());
    }

    // Desktop hosts have no vibration device, so this always uses the
    // tone fallback
    let tone = Arc::new(sense_gateway::audio::CpalToneSink::new()?);
    let output = MorseOutput::new(tone, None);
    output.play(&pattern).await?;
    Ok(())
}

fn require_openai_key(config: &Config) -> anyhow::Result<secrecy::SecretString> {
    config
        .api_keys
        .openai
        .clone()
        .map(secrecy::SecretString::from)
        .context("OPENAI_API_KEY (or api_keys.openai in config.toml) is required")
}

fn build_announcer(config: &Config) -> anyhow::Result<Arc<SpeechAnnouncer>> {
    let tts = TextToSpeech::new(
        require_openai_key(config)?,
        config.voice.tts_model.clone(),
        config.voice.tts_voice.clone(),
        config.voice.tts_speed,
    )?;
    Ok(Arc::new(SpeechAnnouncer::new(Arc::new(tts))))
}

fn build_recognizer(config: &Config) -> anyhow::Result<Arc<MicRecognizer>> {
    let stt = SpeechToText::new(require_openai_key(config)?, config.voice.stt_model.clone())?;
    Ok(Arc::new(MicRecognizer::new(Arc::new(stt))))
}

/// Speak one utterance
async fn speak(config: &Config, text: &str) -> anyhow::Result<()> {
    let announcer = build_announcer(config)?;
    announcer.speak(text).await?;
    Ok(())
}

/// Run the guided impairment selection once
async fn select(config: &Config) -> anyhow::Result<()> {
    let flow = GuidedSelection::impairment_profiles(
        build_announcer(config)?,
        build_recognizer(config)?,
    );

    let selected = flow.select().await?;
    println!("Selected profile: {selected}");
    println!(
        "Set `impairment = \"{selected}\"` in {} to keep it.",
        Config::config_path().display()
    );
    Ok(())
}

/// Numbered stdout targets for exercising the command loop
struct TestTargets {
    count: usize,
}

impl TargetProvider for TestTargets {
    fn snapshot(&self) -> Vec<CommandTarget> {
        (1..=self.count)
            .map(|i| {
                CommandTarget::new(format!("test-target-{i}"), move || {
                    println!("* target {i} activated");
                })
            })
            .collect()
    }
}

struct TestNavigator;

impl Navigator for TestNavigator {
    fn back(&self) {
        println!("* navigate back");
    }

    fn forward(&self) {
        println!("* navigate forward");
    }
}

/// Run the always-listening command loop until interrupted
async fn listen(config: &Config, targets: usize) -> anyhow::Result<()> {
    let mut listener = VoiceCommandListener::new(
        build_recognizer(config)?,
        Arc::new(TestTargets { count: targets }),
        Arc::new(TestNavigator),
    );

    println!("Listening. Say a number 1-{targets}, \"back\", or \"forward\". Ctrl-C to exit.");

    tokio::select! {
        () = listener.run() => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nStopped.");
        }
    }
    Ok(())
}
