//! Tunable constants of the engine.
//!
//! Every value has a default matching the documented behaviour; a TOML file
//! may override any subset of them. The lexicon is not part of the config.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::model::{Mood, RiskLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mood_base: MoodBase,
    /// Occurrences of one term beyond this count are ignored.
    pub term_hit_cap: usize,
    pub modifiers: ModifierConfig,
    pub bonuses: BonusConfig,
    pub floors: SafetyFloors,
    #[serde(deserialize_with = "journal_thresholds")]
    pub journal_thresholds: RiskThresholds,
    pub chat: ChatConfig,
}

/// Upper bound for `chat.frequency_hours`: one year.
pub const MAX_FREQUENCY_HOURS: i64 = 24 * 365;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mood_base: MoodBase::default(),
            term_hit_cap: 3,
            modifiers: ModifierConfig::default(),
            bonuses: BonusConfig::default(),
            floors: SafetyFloors::default(),
            journal_thresholds: RiskThresholds::journal(),
            chat: ChatConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodBase {
    pub very_sad: f64,
    pub sad: f64,
    pub neutral: f64,
    pub happy: f64,
    pub very_happy: f64,
}

impl Default for MoodBase {
    fn default() -> Self {
        Self {
            very_sad: 30.0,
            sad: 20.0,
            neutral: 10.0,
            happy: 5.0,
            very_happy: 0.0,
        }
    }
}

impl MoodBase {
    pub fn score(&self, mood: Mood) -> f64 {
        match mood {
            Mood::VerySad => self.very_sad,
            Mood::Sad => self.sad,
            Mood::Neutral => self.neutral,
            Mood::Happy => self.happy,
            Mood::VeryHappy => self.very_happy,
        }
    }
}

/// Character windows and factors applied around each matched term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierConfig {
    pub intensifier_window: usize,
    pub intensifier_factor: f64,
    pub plurality_window: usize,
    pub plurality_factor: f64,
    /// Only the text *before* the term is inspected for negations.
    pub negation_window: usize,
    pub negation_factor: f64,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            intensifier_window: 50,
            intensifier_factor: 1.2,
            plurality_window: 30,
            plurality_factor: 1.15,
            negation_window: 30,
            negation_factor: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    pub temporal: f64,
    pub location: f64,
    pub recurrence_high_days: u32,
    pub recurrence_high_bonus: f64,
    pub recurrence_low_days: u32,
    pub recurrence_low_bonus: f64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            temporal: 5.0,
            location: 5.0,
            recurrence_high_days: 5,
            recurrence_high_bonus: 20.0,
            recurrence_low_days: 3,
            recurrence_low_bonus: 10.0,
        }
    }
}

impl BonusConfig {
    /// Highest qualifying tier only; tiers do not add up.
    pub fn recurrence_bonus(&self, distinct_days: u32) -> f64 {
        if distinct_days >= self.recurrence_high_days {
            self.recurrence_high_bonus
        } else if distinct_days >= self.recurrence_low_days {
            self.recurrence_low_bonus
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyFloors {
    /// Minimum score whenever the self-harm category scores at all.
    pub self_harm: u8,
    /// Minimum score when violence or threats score and the mood is sad.
    pub violence_when_sad: u8,
}

impl Default for SafetyFloors {
    fn default() -> Self {
        Self {
            self_harm: 70,
            violence_when_sad: 65,
        }
    }
}

/// Lower bounds (inclusive) of the MEDIUM, HIGH and CRITICAL tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub medium: u8,
    pub high: u8,
    pub critical: u8,
}

impl RiskThresholds {
    pub const fn journal() -> Self {
        Self {
            medium: 40,
            high: 65,
            critical: 85,
        }
    }

    pub const fn chat() -> Self {
        Self {
            medium: 30,
            high: 60,
            critical: 80,
        }
    }

    pub fn classify(&self, score: u8) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.medium < self.high && self.high < self.critical && self.critical <= 100 {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "{name} thresholds must be strictly ascending and at most 100, got {}/{}/{}",
                self.medium, self.high, self.critical
            )))
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self::journal()
    }
}

/// A threshold table as written in TOML; missing bounds keep the defaults of
/// the scale being overridden.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdOverrides {
    medium: Option<u8>,
    high: Option<u8>,
    critical: Option<u8>,
}

impl ThresholdOverrides {
    fn over(self, base: RiskThresholds) -> RiskThresholds {
        RiskThresholds {
            medium: self.medium.unwrap_or(base.medium),
            high: self.high.unwrap_or(base.high),
            critical: self.critical.unwrap_or(base.critical),
        }
    }
}

fn journal_thresholds<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<RiskThresholds, D::Error> {
    ThresholdOverrides::deserialize(deserializer).map(|o| o.over(RiskThresholds::journal()))
}

fn chat_thresholds<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<RiskThresholds, D::Error> {
    ThresholdOverrides::deserialize(deserializer).map(|o| o.over(RiskThresholds::chat()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub recent_window: usize,
    pub escalation_window: usize,
    pub min_escalating_pairs: usize,
    pub frequency_hours: i64,
    pub intensity_divisor: f64,
    pub intensity_cap: f64,
    pub intensity_factor: f64,
    pub emotional_above: usize,
    pub highly_emotional_above: usize,
    pub emotional_bonus: f64,
    pub highly_emotional_bonus: f64,
    pub frequency_above: usize,
    pub frequency_bonus: f64,
    pub pattern_weight: f64,
    pub escalation_bonus: f64,
    pub min_messages_for_patterns: usize,
    pub repetition_min_user_messages: usize,
    pub repetition_max_topics: usize,
    pub vague_max_chars: usize,
    pub vague_min_count: usize,
    pub direct_answer_min_chars: usize,
    pub evasion_min_count: usize,
    #[serde(deserialize_with = "chat_thresholds")]
    pub thresholds: RiskThresholds,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            recent_window: 10,
            escalation_window: 5,
            min_escalating_pairs: 2,
            frequency_hours: 24,
            intensity_divisor: 3.0,
            intensity_cap: 25.0,
            intensity_factor: 20.0,
            emotional_above: 2,
            highly_emotional_above: 5,
            emotional_bonus: 8.0,
            highly_emotional_bonus: 15.0,
            frequency_above: 10,
            frequency_bonus: 5.0,
            pattern_weight: 3.0,
            escalation_bonus: 5.0,
            min_messages_for_patterns: 3,
            repetition_min_user_messages: 5,
            repetition_max_topics: 2,
            vague_max_chars: 10,
            vague_min_count: 3,
            direct_answer_min_chars: 10,
            evasion_min_count: 2,
            thresholds: RiskThresholds::chat(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.journal_thresholds.validate("journal")?;
        self.chat.thresholds.validate("chat")?;

        let m = &self.modifiers;
        let b = &self.bonuses;
        let c = &self.chat;
        let mb = &self.mood_base;
        for (name, value) in [
            ("mood_base.very_sad", mb.very_sad),
            ("mood_base.sad", mb.sad),
            ("mood_base.neutral", mb.neutral),
            ("mood_base.happy", mb.happy),
            ("mood_base.very_happy", mb.very_happy),
            ("intensifier_factor", m.intensifier_factor),
            ("plurality_factor", m.plurality_factor),
            ("negation_factor", m.negation_factor),
            ("bonuses.temporal", b.temporal),
            ("bonuses.location", b.location),
            ("recurrence_high_bonus", b.recurrence_high_bonus),
            ("recurrence_low_bonus", b.recurrence_low_bonus),
            ("intensity_cap", c.intensity_cap),
            ("intensity_factor", c.intensity_factor),
            ("emotional_bonus", c.emotional_bonus),
            ("highly_emotional_bonus", c.highly_emotional_bonus),
            ("frequency_bonus", c.frequency_bonus),
            ("pattern_weight", c.pattern_weight),
            ("escalation_bonus", c.escalation_bonus),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.term_hit_cap == 0 {
            return Err(Error::Config("term_hit_cap must be at least 1".into()));
        }
        if c.recent_window == 0 || c.escalation_window == 0 {
            return Err(Error::Config("chat windows must be at least 1".into()));
        }
        if !(c.intensity_divisor.is_finite() && c.intensity_divisor > 0.0) {
            return Err(Error::Config(format!(
                "intensity_divisor must be a positive number, got {}",
                c.intensity_divisor
            )));
        }
        if !(1..=MAX_FREQUENCY_HOURS).contains(&c.frequency_hours) {
            return Err(Error::Config(format!(
                "frequency_hours must be between 1 and {MAX_FREQUENCY_HOURS}, got {}",
                c.frequency_hours
            )));
        }
        if self.bonuses.recurrence_low_days > self.bonuses.recurrence_high_days {
            return Err(Error::Config(
                "recurrence_low_days must not exceed recurrence_high_days".into(),
            ));
        }
        Ok(())
    }
}
