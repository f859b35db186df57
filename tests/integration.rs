use indoc::indoc;
use pretty_assertions::assert_eq;
use wellbeing_risk::summary::{NO_SIGNAL_ADVICE, NO_SIGNAL_SUMMARY};
use wellbeing_risk::{
    analyze_entry, Category, EngineConfig, Mood, RecurrenceRecord, RiskEngine, RiskLevel,
    RiskThresholds,
};

fn record(category: Category, days: u32) -> RecurrenceRecord {
    RecurrenceRecord {
        category,
        distinct_day_count: days,
    }
}

#[test]
fn daily_hitting_in_the_yard_is_flagged() {
    let result = analyze_entry("Il me frappe tous les jours dans la cour", Mood::Sad, &[]);
    assert!(
        result.risk_level >= RiskLevel::Medium,
        "expected at least MEDIUM, got {:?}",
        result.risk_level
    );
    assert_eq!(result.dominant_category, Some(Category::Violence));
    // violence reported by a sad pupil is floored at 65
    assert_eq!(result.risk_score, 65);
    assert_eq!(result.risk_level, RiskLevel::High);

    let violence = &result.category_scores[0];
    assert_eq!(violence.category, Category::Violence);
    assert_eq!(violence.hits, 1);
    assert!((violence.score - 18.0).abs() < 1e-9, "intensified score, got {}", violence.score);
}

#[test]
fn temporal_and_location_bonuses_apply() {
    // 10 (neutral) + 18 (intensified hit) + 5 (tous les jours) + 5 (cour)
    let result = analyze_entry("Il me frappe tous les jours dans la cour", Mood::Neutral, &[]);
    assert_eq!(result.risk_score, 38);
    assert_eq!(result.risk_level, RiskLevel::Low);

    let without_place = analyze_entry("Il me frappe tous les jours", Mood::Neutral, &[]);
    assert_eq!(without_place.risk_score, 33);
}

#[test]
fn wanting_to_die_is_critical() {
    let result = analyze_entry("je veux mourir", Mood::Neutral, &[]);
    assert_eq!(result.risk_level, RiskLevel::Critical);
    assert_eq!(result.risk_score, 85);
    assert_eq!(result.dominant_category, Some(Category::SelfHarm));
    assert!(result.advice.starts_with("Urgence"));
}

#[test]
fn self_harm_floor_survives_negation_and_good_mood() {
    let result = analyze_entry("Je ne veux pas mourir", Mood::VeryHappy, &[]);
    assert!(result.signals[0].multiplier < 1.0);
    assert_eq!(result.risk_score, 70);
    assert_eq!(result.risk_level, RiskLevel::High);
}

#[test]
fn negation_dampens_the_hit() {
    let plain = analyze_entry("il m'a frappé", Mood::Neutral, &[]);
    let negated = analyze_entry("il ne m'a jamais frappé", Mood::Neutral, &[]);

    assert_eq!(plain.risk_score, 25);
    assert!(
        negated.risk_score < plain.risk_score,
        "negated {} should be below {}",
        negated.risk_score,
        plain.risk_score
    );
    assert_eq!(negated.signals.len(), 1, "the hit is still detected");
    assert_eq!(negated.signals[0].category, Category::Violence);
    assert!((negated.signals[0].multiplier - 0.3).abs() < 1e-9);
}

#[test]
fn repeated_term_is_capped_at_three() {
    let three = analyze_entry("il me tape tape tape", Mood::Neutral, &[]);
    let six = analyze_entry("il me tape tape tape tape tape tape", Mood::Neutral, &[]);
    assert_eq!(three.risk_score, 55);
    assert_eq!(six.risk_score, three.risk_score);
    assert_eq!(six.signals.len(), 3);
}

#[test]
fn group_of_aggressors_raises_the_hit() {
    let result = analyze_entry("Ils m'ont insulté à la cantine", Mood::Neutral, &[]);
    assert_eq!(result.dominant_category, Some(Category::Insults));
    assert!((result.signals[0].multiplier - 1.15).abs() < 1e-9);
    // 10 + 9.2 + 5 (cantine)
    assert_eq!(result.risk_score, 24);
    assert_eq!(result.summary, "Insultes ou moqueries répétées (en groupe).");
}

#[test]
fn violence_floor_depends_on_mood() {
    let sad = analyze_entry("on m'a poussé", Mood::VerySad, &[]);
    assert_eq!(sad.risk_score, 65);

    let happy = analyze_entry("on m'a poussé", Mood::Happy, &[]);
    assert_eq!(happy.risk_score, 20);
    assert_eq!(happy.risk_level, RiskLevel::Low);
}

#[test]
fn threats_also_trigger_the_mood_floor() {
    let result = analyze_entry("il me menace", Mood::Sad, &[]);
    assert_eq!(result.dominant_category, Some(Category::Threats));
    assert_eq!(result.risk_score, 65);
}

#[test]
fn empty_text_is_mood_baseline_only() {
    for (mood, expected) in [
        (Mood::VerySad, 30),
        (Mood::Sad, 20),
        (Mood::Neutral, 10),
        (Mood::Happy, 5),
        (Mood::VeryHappy, 0),
    ] {
        let result = analyze_entry("", mood, &[]);
        assert_eq!(result.risk_score, expected, "baseline for {mood}");
        assert_eq!(result.dominant_category, None);
        assert_eq!(result.summary, NO_SIGNAL_SUMMARY);
        assert_eq!(result.advice, NO_SIGNAL_ADVICE);
        assert!(result.category_scores.is_empty());
    }
}

#[test]
fn recurrence_bonus_uses_highest_tier() {
    let result = analyze_entry("", Mood::Happy, &[record(Category::Violence, 5)]);
    assert_eq!(result.risk_score, 25);

    let result = analyze_entry(
        "",
        Mood::Happy,
        &[
            record(Category::Violence, 3),
            record(Category::Insults, 4),
            record(Category::Rumors, 2),
        ],
    );
    assert_eq!(result.risk_score, 25);
    // recurrence alone never picks a dominant category
    assert_eq!(result.dominant_category, None);
}

#[test]
fn score_is_clamped_to_100() {
    let text = "Ils me frappent, me menacent et m'insultent tous les jours. \
                Je veux mourir, en finir, disparaître.";
    let result = analyze_entry(text, Mood::VerySad, &[record(Category::Violence, 9)]);
    assert_eq!(result.risk_score, 100);
    assert_eq!(result.risk_level, RiskLevel::Critical);
    assert_eq!(result.dominant_category, Some(Category::SelfHarm));
}

#[test]
fn summary_mentions_where_it_happens() {
    let text = indoc! {"
        Hier soir elle a publié une photo de moi sur Snapchat.
        Tout le monde se moque de moi en classe.
    "};
    let result = analyze_entry(text, Mood::Sad, &[]);
    // 20 + 20 (publie, snapchat) + 8 (moque) + 5 (hier) + 5 (classe)
    assert_eq!(result.risk_score, 58);
    assert_eq!(result.risk_level, RiskLevel::Medium);
    assert_eq!(result.dominant_category, Some(Category::Cyberbullying));
    assert_eq!(
        result.summary,
        "Signes de cyberharcèlement (en classe, sur les réseaux sociaux)."
    );
    assert!(result.risk_level.requires_alert());
}

#[test]
fn identical_inputs_give_identical_output() {
    let text = "Plusieurs élèves racontent des rumeurs sur moi et ils ont cassé mon casier.";
    let records = [record(Category::Rumors, 3)];
    let a = analyze_entry(text, Mood::Sad, &records);
    let b = analyze_entry(text, Mood::Sad, &records);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn custom_config_changes_thresholds() {
    let config = EngineConfig::from_toml_str(
        r#"
        [journal_thresholds]
        medium = 20
        high = 50
        critical = 90
        "#,
    )
    .unwrap();
    let engine = RiskEngine::new(config).unwrap();
    assert_eq!(engine.config().journal_thresholds.medium, 20);
    assert_eq!(engine.config().chat.thresholds, RiskThresholds::chat());
    let result = engine.analyze_entry("il m'a frappé", Mood::Neutral, &[]);
    assert_eq!(result.risk_score, 25);
    assert_eq!(result.risk_level, RiskLevel::Medium);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = EngineConfig::default();
    config.chat.thresholds.high = 10;
    assert!(RiskEngine::new(config).is_err());

    let mut config = EngineConfig::default();
    config.chat.frequency_hours = 9_000_000_000_000_000_000;
    assert!(RiskEngine::new(config).is_err());

    let mut config = EngineConfig::default();
    config.chat.intensity_divisor = f64::NAN;
    assert!(RiskEngine::new(config).is_err());
}
