//! History table rows

use crate::engine::aggregate::{filter_by_range, sum_macros};
use crate::model::{DateRange, DayLog};
use serde::Serialize;

/// One history row: a day's intake, exercise and macro totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: String,
    pub intake: f64,
    pub exercise_calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Logs inside `range`, newest first
pub fn history(logs: &[DayLog], range: &DateRange) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = filter_by_range(logs, range)
        .into_iter()
        .map(|log| {
            let totals = sum_macros(log);
            HistoryEntry {
                date: log.date.clone(),
                intake: totals.calories,
                exercise_calories: log.exercise_calories,
                protein: totals.protein,
                carbs: totals.carbs,
                fat: totals.fat,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}
