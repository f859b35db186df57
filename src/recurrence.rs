//! Builds [`RecurrenceRecord`]s from a pupil's past entries.
//!
//! Loading the entries is the caller's job; this only aggregates them.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::lexicon::{Category, CategoryTable};
use crate::model::{RecurrenceRecord, RiskLevel};

pub const RECURRENCE_WINDOW_DAYS: i64 = 14;

/// What the recurrence memory needs to know about a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastEntry {
    pub date: NaiveDate,
    pub risk_level: RiskLevel,
    pub dominant_category: Option<Category>,
}

/// Distinct days per category over `today - 13 ..= today`, counting only
/// entries at MEDIUM or above. Categories with no qualifying day are left
/// out; the rest come back in category order.
pub fn summarize_recurrence(entries: &[PastEntry], today: NaiveDate) -> Vec<RecurrenceRecord> {
    let first_day = today - Duration::days(RECURRENCE_WINDOW_DAYS - 1);
    let mut days: CategoryTable<BTreeSet<NaiveDate>> = CategoryTable::default();

    for entry in entries {
        if entry.date < first_day || entry.date > today {
            continue;
        }
        if entry.risk_level < RiskLevel::Medium {
            continue;
        }
        if let Some(category) = entry.dominant_category {
            days[category].insert(entry.date);
        }
    }

    days.iter()
        .filter(|(_, set)| !set.is_empty())
        .map(|(category, set)| RecurrenceRecord {
            category,
            distinct_day_count: set.len() as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn entry(d: u32, level: RiskLevel, category: Category) -> PastEntry {
        PastEntry {
            date: day(d),
            risk_level: level,
            dominant_category: Some(category),
        }
    }

    #[test]
    fn counts_distinct_days_not_entries() {
        let entries = [
            entry(10, RiskLevel::Medium, Category::Insults),
            entry(10, RiskLevel::High, Category::Insults),
            entry(12, RiskLevel::Medium, Category::Insults),
        ];
        assert_eq!(
            summarize_recurrence(&entries, day(15)),
            vec![RecurrenceRecord {
                category: Category::Insults,
                distinct_day_count: 2,
            }]
        );
    }

    #[test]
    fn ignores_low_entries_and_old_days() {
        let entries = [
            entry(1, RiskLevel::Critical, Category::Violence),
            entry(2, RiskLevel::Critical, Category::Violence),
            entry(14, RiskLevel::Low, Category::Violence),
            entry(15, RiskLevel::Medium, Category::Violence),
            PastEntry {
                date: day(15),
                risk_level: RiskLevel::High,
                dominant_category: None,
            },
        ];
        // window for the 15th starts on the 2nd
        let records = summarize_recurrence(&entries, day(15));
        assert_eq!(
            records,
            vec![RecurrenceRecord {
                category: Category::Violence,
                distinct_day_count: 2,
            }]
        );
    }

    #[test]
    fn output_follows_category_order() {
        let entries = [
            entry(5, RiskLevel::Medium, Category::SelfHarm),
            entry(5, RiskLevel::Medium, Category::Violence),
            entry(6, RiskLevel::Medium, Category::Rumors),
        ];
        let categories: Vec<_> = summarize_recurrence(&entries, day(6))
            .into_iter()
            .map(|r| r.category)
            .collect();
        assert_eq!(
            categories,
            vec![Category::Violence, Category::Rumors, Category::SelfHarm]
        );
    }
}
