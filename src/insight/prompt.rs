//! Prompt construction for the nutrition summary

use crate::model::{DayLog, Macros, UserSettings};
use serde::Serialize;

/// Figures handed to the text-generation service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    /// Number of logged days, not the calendar span
    pub period_days: usize,
    pub tmb: f64,
    pub total_intake: Macros,
    /// Kilograms, three decimals
    pub projected_weight_change_kg: String,
    pub daily_average: RoundedMacros,
}

/// Whole-number macros for the prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundedMacros {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

impl AnalysisData {
    pub fn new(
        logs: &[&DayLog],
        settings: &UserSettings,
        totals: &Macros,
        weight_change_kg: f64,
    ) -> Self {
        let avg = totals.per(logs.len().max(1) as f64);
        Self {
            period_days: logs.len(),
            tmb: settings.tmb,
            total_intake: *totals,
            projected_weight_change_kg: format!("{:.3}", weight_change_kg),
            daily_average: RoundedMacros {
                calories: whole(avg.calories),
                protein: whole(avg.protein),
                carbs: whole(avg.carbs),
                fat: whole(avg.fat),
            },
        }
    }
}

fn whole(value: f64) -> String {
    format!("{}", value.round() as i64)
}

/// Render the full prompt text
pub fn build_prompt(data: &AnalysisData) -> String {
    let figures = serde_json::to_string_pretty(data).unwrap_or_default();

    format!(
        "Act as a senior sports nutritionist. Analyse the following user data:\n\
         {figures}\n\n\
         The weight change was projected using the rule 7000 kcal = 1 kg.\n\n\
         Write a short, motivating summary (at most 3 paragraphs):\n\
         1. Assess the quality of the macronutrient distribution.\n\
         2. Comment on the calorie deficit or surplus.\n\
         3. Give one practical tip to improve the results.\n\
         Use simple Markdown formatting.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MealSlot;

    #[test]
    fn test_analysis_data() {
        let a = DayLog::empty("2024-01-01").meal(MealSlot::Lunch, Macros::new(1000.0, 50.0, 100.0, 30.0));
        let b = DayLog::empty("2024-01-02").meal(MealSlot::Lunch, Macros::new(1001.0, 51.0, 100.0, 31.0));
        let totals = Macros::new(2001.0, 101.0, 200.0, 61.0);

        let data = AnalysisData::new(&[&a, &b], &UserSettings::new(2000.0, "Ana"), &totals, -0.2855714);

        assert_eq!(data.period_days, 2);
        assert_eq!(data.projected_weight_change_kg, "-0.286");
        assert_eq!(data.daily_average.calories, "1001");
        assert_eq!(data.daily_average.protein, "51");
        assert_eq!(data.daily_average.fat, "31");
    }

    #[test]
    fn test_no_logs_averages_over_one() {
        let data = AnalysisData::new(&[], &UserSettings::default(), &Macros::ZERO, 0.0);
        assert_eq!(data.period_days, 0);
        assert_eq!(data.daily_average.calories, "0");
        assert_eq!(data.projected_weight_change_kg, "0.000");
    }

    #[test]
    fn test_prompt_contains_figures() {
        let data = AnalysisData::new(&[], &UserSettings::new(1800.0, "Ana"), &Macros::ZERO, 0.5);
        let prompt = build_prompt(&data);

        assert!(prompt.contains("\"periodDays\": 0"));
        assert!(prompt.contains("\"tmb\": 1800.0"));
        assert!(prompt.contains("\"projectedWeightChangeKg\": \"0.500\""));
        assert!(prompt.contains("7000 kcal = 1 kg"));
    }
}
