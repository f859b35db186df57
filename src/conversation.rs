//! Conversation-level analysis.
//!
//! The latest user message is scored with the same category matcher as a
//! journal entry, then combined with signals that only exist across turns:
//! the emotional tone of the recent window, message frequency, rising
//! intensity and a few behavioural patterns (repetition, vague messages,
//! evaded questions).
//!
//! Scores here use their own intensity scale and thresholds (30/60/80),
//! independent from the journal classifier.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::{ChatConfig, EngineConfig};
use crate::journal::{dominant_category, score_categories};
use crate::lexicon::{CategoryTable, Topic, EMOTIONAL_KEYWORDS, QUESTION_STOPWORDS, TOPIC_KEYWORDS};
use crate::model::{
    CategoryScore, ChatRiskAnalysis, ConversationContext, ConversationMessage, Sender,
};
use crate::normalize::{contains_any, contains_term, count_terms, normalize};
use crate::summary;

const VAGUE_MARKERS: [&str; 4] = ["...", "\u{2026}", "??", "!!"];
const MIN_QUESTION_WORD_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTone {
    Neutral,
    Emotional,
    HighlyEmotional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcerningPattern {
    TopicRepetition,
    Escalation,
    VagueMessages,
    QuestionEvasion,
}

impl ConcerningPattern {
    pub fn description(self) -> &'static str {
        match self {
            ConcerningPattern::TopicRepetition => "Répétition obsessionnelle d'un même sujet",
            ConcerningPattern::Escalation => "Escalade de l'intensité émotionnelle",
            ConcerningPattern::VagueMessages => "Messages courts et vagues répétés",
            ConcerningPattern::QuestionEvasion => "Évitement des questions posées",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternReport {
    pub patterns: Vec<ConcerningPattern>,
    /// Rising intensity, kept even when the window is too short for patterns.
    pub escalation: bool,
}

// ---------------------------------------------------------------------------
// Per-message measures
// ---------------------------------------------------------------------------

fn intensity_from_scores(scores: &CategoryTable<CategoryScore>, chat: &ChatConfig) -> f64 {
    let max = scores.iter().map(|(_, s)| s.score).fold(0.0, f64::max);
    (max / chat.intensity_divisor).min(chat.intensity_cap)
}

/// `min(max category score / 3, 25)` with the default config.
pub fn message_intensity(text: &str, config: &EngineConfig) -> f64 {
    let (scores, _) = score_categories(&normalize(text), config);
    intensity_from_scores(&scores, &config.chat)
}

/// Keyword lookup in a fixed topic order; the first topic that matches wins.
pub fn message_topic(text: &str) -> Topic {
    let normalized = normalize(text);
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&normalized, keywords))
        .map_or(Topic::General, |(topic, _)| *topic)
}

fn is_vague(msg: &ConversationMessage, chat: &ChatConfig) -> bool {
    let content = msg.content.trim();
    content.chars().count() < chat.vague_max_chars
        && VAGUE_MARKERS.iter().any(|m| content.contains(m))
}

/// A reply counts as direct when it is long enough and reuses one of the
/// question's content words.
fn is_direct_answer(question: &str, reply: &str, chat: &ChatConfig) -> bool {
    if reply.trim().chars().count() <= chat.direct_answer_min_chars {
        return false;
    }
    let question = normalize(question);
    let reply = normalize(reply);
    question
        .split([' ', '\''])
        .filter(|w| w.chars().count() >= MIN_QUESTION_WORD_CHARS)
        .filter(|w| !QUESTION_STOPWORDS.contains(w))
        .any(|w| contains_term(&reply, w))
}

// ---------------------------------------------------------------------------
// Window measures
// ---------------------------------------------------------------------------

fn last_user_messages(window: &[ConversationMessage], n: usize) -> Vec<&ConversationMessage> {
    let mut users: Vec<_> = window.iter().rev().filter(|m| m.is_user()).take(n).collect();
    users.reverse();
    users
}

pub fn emotional_tone(window: &[ConversationMessage], chat: &ChatConfig) -> EmotionalTone {
    let hits: usize = window
        .iter()
        .filter(|m| m.is_user())
        .map(|m| count_terms(&normalize(&m.content), EMOTIONAL_KEYWORDS))
        .sum();
    if hits > chat.highly_emotional_above {
        EmotionalTone::HighlyEmotional
    } else if hits > chat.emotional_above {
        EmotionalTone::Emotional
    } else {
        EmotionalTone::Neutral
    }
}

/// Messages from either side in the `frequency_hours` before `now`.
pub fn message_frequency(
    messages: &[ConversationMessage],
    now: DateTime<Utc>,
    chat: &ChatConfig,
) -> usize {
    // an unrepresentable window reaches back to the first message
    let since = Duration::try_hours(chat.frequency_hours)
        .and_then(|window| now.checked_sub_signed(window));
    messages
        .iter()
        .filter(|m| since.map_or(true, |since| m.timestamp >= since) && m.timestamp <= now)
        .count()
}

/// True when the intensity of the last user messages rises on at least
/// `min_escalating_pairs` consecutive steps.
pub fn escalation_trend(window: &[ConversationMessage], config: &EngineConfig) -> bool {
    let chat = &config.chat;
    let intensities: Vec<f64> = last_user_messages(window, chat.escalation_window)
        .into_iter()
        .map(|m| message_intensity(&m.content, config))
        .collect();
    let rising = intensities.windows(2).filter(|w| w[1] > w[0]).count();
    rising >= chat.min_escalating_pairs
}

fn repeats_topic(window: &[ConversationMessage], chat: &ChatConfig) -> bool {
    let users = last_user_messages(window, chat.repetition_min_user_messages);
    if users.len() < chat.repetition_min_user_messages {
        return false;
    }
    let topics: HashSet<Topic> = users.iter().map(|m| message_topic(&m.content)).collect();
    topics.len() <= chat.repetition_max_topics
}

fn evasive_replies(window: &[ConversationMessage], chat: &ChatConfig) -> usize {
    let mut evasive = 0;
    for (i, msg) in window.iter().enumerate() {
        if msg.sender != Sender::Bot || !msg.content.contains('?') {
            continue;
        }
        let Some(reply) = window[i + 1..].iter().find(|m| m.is_user()) else {
            continue;
        };
        if !is_direct_answer(&msg.content, &reply.content, chat) {
            evasive += 1;
        }
    }
    evasive
}

pub fn detect_patterns(
    window: &[ConversationMessage],
    escalation: bool,
    chat: &ChatConfig,
) -> PatternReport {
    if window.len() < chat.min_messages_for_patterns {
        return PatternReport {
            patterns: Vec::new(),
            escalation,
        };
    }

    let mut patterns = Vec::new();
    if repeats_topic(window, chat) {
        patterns.push(ConcerningPattern::TopicRepetition);
    }
    if escalation {
        patterns.push(ConcerningPattern::Escalation);
    }
    let vague = window
        .iter()
        .filter(|m| m.is_user() && is_vague(m, chat))
        .count();
    if vague >= chat.vague_min_count {
        patterns.push(ConcerningPattern::VagueMessages);
    }
    if evasive_replies(window, chat) >= chat.evasion_min_count {
        patterns.push(ConcerningPattern::QuestionEvasion);
    }
    PatternReport {
        patterns,
        escalation,
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

pub fn chat_score(
    intensity: f64,
    tone: EmotionalTone,
    frequency: usize,
    pattern_count: usize,
    escalation: bool,
    chat: &ChatConfig,
) -> u8 {
    let mut score = intensity * chat.intensity_factor;
    score += match tone {
        EmotionalTone::HighlyEmotional => chat.highly_emotional_bonus,
        EmotionalTone::Emotional => chat.emotional_bonus,
        EmotionalTone::Neutral => 0.0,
    };
    if frequency > chat.frequency_above {
        score += chat.frequency_bonus;
    }
    score += pattern_count as f64 * chat.pattern_weight;
    if escalation {
        score += chat.escalation_bonus;
    }
    (score.round() as i64).clamp(0, 100) as u8
}

/// Scores `text`, the newest user message, against `history` (oldest first,
/// not including `text`). `now` stamps the new message and anchors the
/// frequency window.
pub fn analyze(
    text: &str,
    history: &[ConversationMessage],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> ChatRiskAnalysis {
    let chat = &config.chat;
    let mut messages = history.to_vec();
    messages.push(ConversationMessage::user(text, now));
    let window = &messages[messages.len().saturating_sub(chat.recent_window)..];

    let normalized = normalize(text);
    let (scores, _) = score_categories(&normalized, config);
    let intensity = intensity_from_scores(&scores, chat);
    let dominant = dominant_category(&scores);

    let tone = emotional_tone(window, chat);
    let frequency = message_frequency(&messages, now, chat);
    let report = detect_patterns(window, escalation_trend(window, config), chat);
    debug!(
        intensity,
        ?tone,
        frequency,
        escalation = report.escalation,
        patterns = ?report.patterns,
        "conversation context computed"
    );

    let risk_score = chat_score(
        intensity,
        tone,
        frequency,
        report.patterns.len(),
        report.escalation,
        chat,
    );
    let risk_level = chat.thresholds.classify(risk_score);

    let concerning_patterns: Vec<String> = report
        .patterns
        .iter()
        .map(|p| p.description().to_string())
        .collect();
    let (mut summary, advice) = summary::describe(dominant, &normalized);
    if !concerning_patterns.is_empty() {
        summary = format!("{summary} Motifs relevés : {}.", concerning_patterns.join(", "));
    }

    ChatRiskAnalysis {
        risk_level,
        risk_score,
        dominant_category: dominant,
        summary,
        advice,
        concerning_patterns,
        conversation_context: ConversationContext {
            total_messages: messages.len(),
            recent_messages: window.len(),
            emotional_tone: tone,
            frequency,
            escalation_trend: report.escalation,
        },
    }
}
