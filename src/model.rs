use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::EmotionalTone;
use crate::error::{Error, Result};
use crate::lexicon::Category;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Self-reported mood attached to a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mood {
    VerySad,
    Sad,
    Neutral,
    Happy,
    VeryHappy,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::VerySad,
        Mood::Sad,
        Mood::Neutral,
        Mood::Happy,
        Mood::VeryHappy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::VerySad => "VERY_SAD",
            Mood::Sad => "SAD",
            Mood::Neutral => "NEUTRAL",
            Mood::Happy => "HAPPY",
            Mood::VeryHappy => "VERY_HAPPY",
        }
    }

    pub fn is_sad(self) -> bool {
        matches!(self, Mood::VerySad | Mood::Sad)
    }
}

impl FromStr for Mood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid("mood", s))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sender {
    User,
    Bot,
}

impl FromStr for Sender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Sender::User),
            "BOT" => Ok(Sender::Bot),
            _ => Err(Error::invalid("sender", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn bot(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::Bot,
            content: content.into(),
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Number of distinct days in the trailing 14 days on which `category`
/// reached MEDIUM or above for the same pupil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRecord {
    pub category: Category,
    pub distinct_day_count: u32,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Whether the alerting workflow should open a safeguarding alert.
    pub fn requires_alert(self) -> bool {
        self >= RiskLevel::Medium
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One counted occurrence of a lexicon term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub category: Category,
    pub term: &'static str,
    /// Byte offset in the normalized text.
    pub position: usize,
    pub multiplier: f64,
    pub contribution: f64,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub hits: usize,
    /// Weighted hits before contextual modifiers.
    pub raw_score: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub dominant_category: Option<Category>,
    pub summary: String,
    pub advice: String,
    pub category_scores: Vec<CategoryScore>,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationContext {
    pub total_messages: usize,
    pub recent_messages: usize,
    pub emotional_tone: EmotionalTone,
    /// Messages from either side in the trailing frequency window.
    pub frequency: usize,
    pub escalation_trend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRiskAnalysis {
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub dominant_category: Option<Category>,
    pub summary: String,
    pub advice: String,
    pub concerning_patterns: Vec<String>,
    pub conversation_context: ConversationContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_parses_case_insensitively() {
        assert_eq!("very_sad".parse::<Mood>().unwrap(), Mood::VerySad);
        assert_eq!(" HAPPY ".parse::<Mood>().unwrap(), Mood::Happy);
    }

    #[test]
    fn unknown_mood_is_rejected() {
        let err = "ANGRY".parse::<Mood>().unwrap_err();
        match err {
            Error::InvalidInput { field, value } => {
                assert_eq!(field, "mood");
                assert_eq!(value, "ANGRY");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn unknown_sender_is_rejected() {
        assert_eq!("bot".parse::<Sender>().unwrap(), Sender::Bot);
        assert!(matches!(
            "SYSTEM".parse::<Sender>(),
            Err(Error::InvalidInput { field: "sender", .. })
        ));
    }

    #[test]
    fn alert_starts_at_medium() {
        assert!(!RiskLevel::Low.requires_alert());
        assert!(RiskLevel::Medium.requires_alert());
        assert!(RiskLevel::High.requires_alert());
        assert!(RiskLevel::Critical.requires_alert());
    }

    #[test]
    fn serde_uses_screaming_case() {
        let json = serde_json::to_string(&Mood::VeryHappy).unwrap();
        assert_eq!(json, "\"VERY_HAPPY\"");
        assert!(serde_json::from_str::<Mood>("\"GRUMPY\"").is_err());
    }
}
