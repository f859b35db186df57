use proptest::prelude::*;
use wellbeing_risk::lexicon::all_terms;
use wellbeing_risk::{
    analyze_entry, Category, Mood, RecurrenceRecord, RiskLevel, RiskThresholds,
};

fn mood_strategy() -> impl Strategy<Value = Mood> {
    prop::sample::select(Mood::ALL.to_vec())
}

fn term_strategy() -> impl Strategy<Value = (Category, &'static str)> {
    prop::sample::select(all_terms().collect::<Vec<_>>())
}

fn self_harm_term_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(Category::SelfHarm.terms().to_vec())
}

fn recurrence_strategy() -> impl Strategy<Value = Vec<RecurrenceRecord>> {
    prop::collection::vec(
        (prop::sample::select(Category::ALL.to_vec()), 0u32..20),
        0..6,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(category, distinct_day_count)| RecurrenceRecord {
                category,
                distinct_day_count,
            })
            .collect()
    })
}

fn contribution(text: &str, category: Category, term: &str) -> f64 {
    analyze_entry(text, Mood::Neutral, &[])
        .signals
        .iter()
        .find(|s| s.category == category && s.term == term)
        .map(|s| s.contribution)
        .unwrap_or_else(|| panic!("{term} not detected in {text:?}"))
}

proptest! {
    /// Property: the score is always within [0, 100].
    #[test]
    fn score_in_range(
        text in ".{0,300}",
        mood in mood_strategy(),
        records in recurrence_strategy(),
    ) {
        let result = analyze_entry(&text, mood, &records);
        prop_assert!(result.risk_score <= 100);
    }

    /// Property: repeating a term past its third occurrence changes nothing.
    #[test]
    fn hit_cap_is_idempotent((category, term) in term_strategy(), extra in 1usize..6) {
        let three = vec![term; 3].join(" ");
        let more = vec![term; 3 + extra].join(" ");
        let a = analyze_entry(&three, Mood::Neutral, &[]);
        let b = analyze_entry(&more, Mood::Neutral, &[]);
        prop_assert_eq!(a.risk_score, b.risk_score, "{} ({})", term, category);
        prop_assert_eq!(a.category_scores, b.category_scores);
    }

    /// Property: a preceding negation strictly lowers the occurrence's weight.
    #[test]
    fn negation_lowers_contribution((category, term) in term_strategy()) {
        let plain = contribution(&format!("il m'a {term}"), category, term);
        let negated = contribution(&format!("il m'a jamais {term}"), category, term);
        prop_assert!(negated < plain, "{}: {} vs {}", term, negated, plain);
    }

    /// Property: any self-harm term forces at least HIGH.
    #[test]
    fn self_harm_floor(
        prefix in "[a-z ]{0,40}",
        term in self_harm_term_strategy(),
        suffix in "[a-z ]{0,40}",
        mood in mood_strategy(),
    ) {
        let result = analyze_entry(&format!("{prefix} {term} {suffix}"), mood, &[]);
        prop_assert!(result.risk_level >= RiskLevel::High, "{:?}", result.risk_level);
    }

    /// Property: same input, same bytes out.
    #[test]
    fn deterministic(text in ".{0,200}", mood in mood_strategy()) {
        let a = serde_json::to_string(&analyze_entry(&text, mood, &[])).unwrap();
        let b = serde_json::to_string(&analyze_entry(&text, mood, &[])).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Property: classification never steps down as the score rises.
    #[test]
    fn classification_is_monotonic(score in 0u8..100) {
        for thresholds in [RiskThresholds::journal(), RiskThresholds::chat()] {
            prop_assert!(thresholds.classify(score) <= thresholds.classify(score + 1));
        }
    }
}
