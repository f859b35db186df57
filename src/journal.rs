//! Single-entry classifier: mood + free text -> scored, classified result.

use tracing::{debug, trace};

use crate::config::{EngineConfig, ModifierConfig};
use crate::lexicon::{
    Category, CategoryTable, INTENSIFIERS, LEXICON, LOCATION_TERMS, NEGATIONS, PLURALITY_MARKERS,
    TEMPORAL_TERMS,
};
use crate::model::{AnalysisResult, CategoryScore, Mood, RecurrenceRecord, Signal};
use crate::normalize::{context_around, contains_any, normalize, term_matches, window};
use crate::summary;

const CONTEXT_WINDOW_CHARS: usize = 60;

// ---------------------------------------------------------------------------
// Category matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occurrence {
    pub term: &'static str,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryMatch {
    pub occurrences: Vec<Occurrence>,
    pub raw_score: f64,
}

impl CategoryMatch {
    pub fn hits(&self) -> usize {
        self.occurrences.len()
    }
}

/// Whole-word occurrences of every lexicon term, at most `hit_cap` per term.
pub fn match_categories(normalized: &str, hit_cap: usize) -> CategoryTable<CategoryMatch> {
    let mut table: CategoryTable<CategoryMatch> = CategoryTable::default();
    for def in &LEXICON {
        let entry = &mut table[def.category];
        for &term in def.terms {
            let before = entry.occurrences.len();
            entry.occurrences.extend(
                term_matches(normalized, term)
                    .take(hit_cap)
                    .map(|(start, end)| Occurrence { term, start, end }),
            );
            let counted = entry.occurrences.len() - before;
            entry.raw_score += def.weight * counted as f64;
        }
    }
    table
}

// ---------------------------------------------------------------------------
// Contextual modifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub intensified: bool,
    pub plural: bool,
    pub negated: bool,
}

impl Modifiers {
    pub fn inspect(normalized: &str, occ: &Occurrence, cfg: &ModifierConfig) -> Self {
        let around = |width: usize| {
            window(
                normalized,
                occ.start.saturating_sub(width),
                occ.end.saturating_add(width),
            )
        };
        let before = window(
            normalized,
            occ.start.saturating_sub(cfg.negation_window),
            occ.start,
        );
        Self {
            intensified: contains_any(around(cfg.intensifier_window), INTENSIFIERS),
            plural: contains_any(around(cfg.plurality_window), PLURALITY_MARKERS),
            negated: contains_any(before, NEGATIONS),
        }
    }

    pub fn factor(&self, cfg: &ModifierConfig) -> f64 {
        let mut factor = 1.0;
        if self.intensified {
            factor *= cfg.intensifier_factor;
        }
        if self.plural {
            factor *= cfg.plurality_factor;
        }
        if self.negated {
            factor *= cfg.negation_factor;
        }
        factor
    }
}

/// Post-modifier score of every category, plus the per-occurrence breakdown.
pub fn score_categories(
    normalized: &str,
    config: &EngineConfig,
) -> (CategoryTable<CategoryScore>, Vec<Signal>) {
    let matches = match_categories(normalized, config.term_hit_cap);
    let mut signals = Vec::new();
    let scores = CategoryTable::from_fn(|category| {
        let m = &matches[category];
        let weight = category.weight();
        let mut score = 0.0;
        for occ in &m.occurrences {
            let multiplier = Modifiers::inspect(normalized, occ, &config.modifiers)
                .factor(&config.modifiers);
            let contribution = weight * multiplier;
            score += contribution;
            signals.push(Signal {
                category,
                term: occ.term,
                position: occ.start,
                multiplier,
                contribution,
                context: context_around(normalized, occ.start, occ.end, CONTEXT_WINDOW_CHARS),
            });
        }
        CategoryScore {
            category,
            hits: m.hits(),
            raw_score: m.raw_score,
            score,
        }
    });
    (scores, signals)
}

/// Highest nonzero score; on a tie the category listed first keeps the lead.
pub fn dominant_category(scores: &CategoryTable<CategoryScore>) -> Option<Category> {
    let mut best: Option<(Category, f64)> = None;
    for (category, s) in scores.iter() {
        if s.score <= 0.0 {
            continue;
        }
        match best {
            Some((_, top)) if s.score <= top => {}
            _ => best = Some((category, s.score)),
        }
    }
    best.map(|(category, _)| category)
}

// ---------------------------------------------------------------------------
// Bonuses and floors
// ---------------------------------------------------------------------------

fn recurrence_bonus(records: &[RecurrenceRecord], config: &EngineConfig) -> f64 {
    // Duplicate records for one category collapse to the largest count.
    let mut days: CategoryTable<u32> = CategoryTable::default();
    for r in records {
        days[r.category] = days[r.category].max(r.distinct_day_count);
    }
    days.iter()
        .map(|(_, d)| config.bonuses.recurrence_bonus(*d))
        .sum()
}

fn apply_safety_floors(
    score: i64,
    scores: &CategoryTable<CategoryScore>,
    mood: Mood,
    config: &EngineConfig,
) -> i64 {
    let mut floored = score;
    if scores[Category::SelfHarm].score > 0.0 {
        floored = floored.max(i64::from(config.floors.self_harm));
    }
    let violent = scores[Category::Violence].score > 0.0 || scores[Category::Threats].score > 0.0;
    if violent && mood.is_sad() {
        floored = floored.max(i64::from(config.floors.violence_when_sad));
    }
    if floored != score {
        debug!(score, floored, "safety floor applied");
    }
    floored
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn analyze(
    text: &str,
    mood: Mood,
    recurrence: &[RecurrenceRecord],
    config: &EngineConfig,
) -> AnalysisResult {
    let normalized = normalize(text);
    let (scores, signals) = score_categories(&normalized, config);

    let mut total = config.mood_base.score(mood);
    total += scores.iter().map(|(_, s)| s.score).sum::<f64>();
    if contains_any(&normalized, TEMPORAL_TERMS) {
        total += config.bonuses.temporal;
    }
    if contains_any(&normalized, LOCATION_TERMS) {
        total += config.bonuses.location;
    }
    total += recurrence_bonus(recurrence, config);
    trace!(total, signals = signals.len(), "journal entry scored");

    let floored = apply_safety_floors(total.round() as i64, &scores, mood, config);
    let risk_score = floored.clamp(0, 100) as u8;
    let risk_level = config.journal_thresholds.classify(risk_score);
    let dominant = dominant_category(&scores);
    debug!(risk_score, %risk_level, ?dominant, "journal entry classified");

    let (summary, advice) = summary::describe(dominant, &normalized);
    AnalysisResult {
        risk_score,
        risk_level,
        dominant_category: dominant,
        summary,
        advice,
        category_scores: scores
            .iter()
            .filter(|(_, s)| s.hits > 0)
            .map(|(_, s)| s.clone())
            .collect(),
        signals,
    }
}
