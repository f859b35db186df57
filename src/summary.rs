//! Fixed summary and advice wording per category.
//!
//! Pure lookup: the same category and text always give the same wording.

use crate::lexicon::{Category, CLASSROOM_TERMS, ONLINE_TERMS, PLURALITY_MARKERS};
use crate::normalize::contains_any;

pub const NO_SIGNAL_SUMMARY: &str = "Aucun signal de détresse détecté.";
pub const NO_SIGNAL_ADVICE: &str =
    "Pas d'action particulière : rester disponible et à l'écoute de l'élève.";

fn summary_phrase(category: Category) -> &'static str {
    match category {
        Category::Violence => "Signes de violences physiques",
        Category::Threats => "Menaces ou intimidation signalées",
        Category::Insults => "Insultes ou moqueries répétées",
        Category::Exclusion => "Sentiment d'exclusion ou d'isolement",
        Category::Cyberbullying => "Signes de cyberharcèlement",
        Category::Theft => "Vols ou dégradations d'affaires personnelles",
        Category::Rumors => "Rumeurs ou propos diffamants",
        Category::Distress => "Détresse psychologique exprimée",
        Category::SelfHarm => "Idées suicidaires ou d'automutilation exprimées",
    }
}

fn advice_phrase(category: Category) -> &'static str {
    match category {
        Category::Violence => {
            "Rencontrer l'élève rapidement, sécuriser les lieux signalés et informer la direction."
        }
        Category::Threats => {
            "Prendre les menaces au sérieux : entretien individuel et signalement à la vie scolaire."
        }
        Category::Insults => {
            "Échanger avec l'élève et rappeler les règles de respect au groupe concerné."
        }
        Category::Exclusion => {
            "Favoriser l'intégration de l'élève et proposer un temps d'échange avec un adulte référent."
        }
        Category::Cyberbullying => {
            "Conserver les preuves (captures d'écran) et accompagner l'élève dans les signalements en ligne."
        }
        Category::Theft => {
            "Vérifier les faits, protéger les affaires de l'élève et prévenir la famille."
        }
        Category::Rumors => {
            "Identifier la source des rumeurs et organiser une médiation encadrée."
        }
        Category::Distress => {
            "Proposer un rendez-vous avec l'infirmière ou le psychologue scolaire."
        }
        Category::SelfHarm => {
            "Urgence : ne pas laisser l'élève seul, alerter immédiatement la direction, l'infirmière et la famille."
        }
    }
}

/// Where the problem seems to happen, in a fixed order.
fn context_tokens(normalized: &str) -> Vec<&'static str> {
    let mut tokens = Vec::new();
    if contains_any(normalized, CLASSROOM_TERMS) {
        tokens.push("en classe");
    }
    if contains_any(normalized, ONLINE_TERMS) {
        tokens.push("sur les réseaux sociaux");
    }
    if contains_any(normalized, PLURALITY_MARKERS) {
        tokens.push("en groupe");
    }
    tokens
}

/// Returns `(summary, advice)` for the dominant category of a text.
pub fn describe(dominant: Option<Category>, normalized: &str) -> (String, String) {
    let Some(category) = dominant else {
        return (NO_SIGNAL_SUMMARY.to_string(), NO_SIGNAL_ADVICE.to_string());
    };
    let tokens = context_tokens(normalized);
    let summary = if tokens.is_empty() {
        format!("{}.", summary_phrase(category))
    } else {
        format!("{} ({}).", summary_phrase(category), tokens.join(", "))
    };
    (summary, advice_phrase(category).to_string())
}
