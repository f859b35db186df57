use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use wellbeing_risk::{
    ConversationMessage, EngineConfig, Error, Mood, RecurrenceRecord, Result, RiskEngine,
};

#[derive(Parser)]
#[command(
    name = "wellbeing-risk",
    about = "Score pupil journal entries and chat transcripts for safeguarding risk",
    version
)]
struct Cli {
    /// TOML file overriding the default scoring constants
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score journal entries (reads stdin if no file is given)
    Entry {
        /// VERY_SAD, SAD, NEUTRAL, HAPPY or VERY_HAPPY
        #[arg(long, default_value = "NEUTRAL")]
        mood: String,

        /// JSON array of {"category", "distinct_day_count"} records
        #[arg(long)]
        recurrence: Option<PathBuf>,

        files: Vec<PathBuf>,
    },
    /// Score the latest user message of a chat transcript (JSON array of messages)
    Chat {
        transcript: PathBuf,

        /// Score this text as a new message instead of the transcript's last user message
        #[arg(long)]
        message: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            EngineConfig::from_path(path)?
        }
        None => EngineConfig::default(),
    };
    let engine = RiskEngine::new(config)?;

    match cli.command {
        Command::Entry {
            mood,
            recurrence,
            files,
        } => {
            let mood: Mood = mood.parse()?;
            let records: Vec<RecurrenceRecord> = match recurrence {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            if files.is_empty() {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                print_json(&engine.analyze_entry(&input, mood, &records))?;
            } else {
                for path in &files {
                    let text = std::fs::read_to_string(path)?;
                    print_json(&engine.analyze_entry(&text, mood, &records))?;
                }
            }
        }
        Command::Chat {
            transcript,
            message,
        } => {
            let mut history: Vec<ConversationMessage> = read_json(&transcript)?;
            let (text, now) = match message {
                Some(text) => (text, Utc::now()),
                None => {
                    let latest = take_latest_user_message(&mut history)
                        .ok_or_else(|| Error::NoUserMessage(transcript.display().to_string()))?;
                    (latest.content, latest.timestamp)
                }
            };
            print_json(&engine.analyze_conversation(&text, &history, now))?;
        }
    }
    Ok(())
}

/// Removes the last USER message and everything after it, returning it.
fn take_latest_user_message(
    history: &mut Vec<ConversationMessage>,
) -> Option<ConversationMessage> {
    let last_user = history.iter().rposition(ConversationMessage::is_user)?;
    let latest = history.remove(last_user);
    history.truncate(last_user);
    Some(latest)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
