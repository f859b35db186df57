//! Safeguarding risk scoring for pupil journal entries and wellbeing chat
//! conversations.
//!
//! Two deterministic analyzers share one French lexicon:
//!
//! - [`analyze_entry`] scores a single journal entry from its text, the
//!   pupil's mood and the recurrence of earlier concerns. Contextual
//!   modifiers (intensifiers, groups of aggressors, negations) adjust each
//!   matched term, and safety floors keep self-harm and violence reported by
//!   a sad pupil from being under-classified.
//! - [`analyze_conversation`] scores the newest chat message and adds
//!   cross-message signals: emotional tone, frequency, escalation and
//!   behavioural patterns.
//!
//! Both are pure functions of their inputs: no I/O, no shared mutable state,
//! identical inputs give identical outputs.

pub mod config;
pub mod conversation;
pub mod error;
pub mod journal;
pub mod lexicon;
pub mod model;
pub mod normalize;
pub mod recurrence;
pub mod summary;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub use config::{EngineConfig, RiskThresholds};
pub use conversation::{ConcerningPattern, EmotionalTone};
pub use error::{Error, Result};
pub use lexicon::{Category, Topic};
pub use model::{
    AnalysisResult, CategoryScore, ChatRiskAnalysis, ConversationContext, ConversationMessage,
    Mood, RecurrenceRecord, RiskLevel, Sender, Signal,
};
pub use recurrence::{summarize_recurrence, PastEntry};

static DEFAULT_ENGINE: Lazy<RiskEngine> = Lazy::new(RiskEngine::default);

/// Both analyzers bound to one validated configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: EngineConfig,
}

impl RiskEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze_entry(
        &self,
        text: &str,
        mood: Mood,
        recurrence: &[RecurrenceRecord],
    ) -> AnalysisResult {
        journal::analyze(text, mood, recurrence, &self.config)
    }

    pub fn analyze_conversation(
        &self,
        text: &str,
        history: &[ConversationMessage],
        now: DateTime<Utc>,
    ) -> ChatRiskAnalysis {
        conversation::analyze(text, history, now, &self.config)
    }
}

/// Scores a journal entry with the default configuration.
pub fn analyze_entry(text: &str, mood: Mood, recurrence: &[RecurrenceRecord]) -> AnalysisResult {
    DEFAULT_ENGINE.analyze_entry(text, mood, recurrence)
}

/// Scores the newest chat message `text` against the earlier `history`
/// with the default configuration.
pub fn analyze_conversation(
    text: &str,
    history: &[ConversationMessage],
    now: DateTime<Utc>,
) -> ChatRiskAnalysis {
    DEFAULT_ENGINE.analyze_conversation(text, history, now)
}
