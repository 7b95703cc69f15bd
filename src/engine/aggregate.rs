//! Dashboard aggregation
//!
//! Intake is summed from the logs that fall inside the range. Basal burn is
//! charged for every calendar day of the range, logged or not, so a range
//! with gaps reads as a larger deficit.

use crate::model::{parse_date, DateRange, DayLog, Macros, UserSettings};
use serde::Serialize;

/// Energy equivalent of one kilogram of body mass (kcal).
///
/// Conventional approximation, not a per-user measurement.
pub const KCAL_PER_KG: f64 = 7000.0;

/// Derived dashboard statistics, recomputed on every call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Calories and macros eaten across the filtered logs
    pub totals: Macros,
    /// `tmb * days_count`
    pub total_basal_burn: f64,
    /// Sum of logged exercise calories
    pub total_exercise_burn: f64,
    /// Basal plus exercise
    pub total_burned: f64,
    /// Intake minus total burn; negative is a deficit
    pub calorie_balance: f64,
    /// Intake minus basal burn only
    pub basal_balance: f64,
    /// `calorie_balance / KCAL_PER_KG`
    pub weight_change_kg: f64,
    /// Calendar days in the range, at least 1
    pub days_count: u32,
    /// Logs that fell inside the range
    pub log_count: usize,
    /// Totals divided by `max(1, log_count)`
    pub daily_average: Macros,
    /// One point per filtered log, ascending by date
    pub series: Vec<DailyPoint>,
}

/// One chart row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: String,
    /// Calories eaten that day
    pub intake: f64,
    /// `tmb + exercise` for that day
    pub expenditure: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Logs whose date lies in `[start_date, end_date]`.
///
/// Comparison is lexicographic, which matches chronological order for
/// zero-padded ISO dates. An inverted range matches nothing.
pub fn filter_by_range<'a>(logs: &'a [DayLog], range: &DateRange) -> Vec<&'a DayLog> {
    logs.iter().filter(|log| range.contains(&log.date)).collect()
}

/// Whole days from start to end, inclusive, never less than 1.
///
/// Unparseable bounds count as a single day.
pub fn compute_day_count(range: &DateRange) -> u32 {
    let (Ok(start), Ok(end)) = (parse_date(&range.start_date), parse_date(&range.end_date))
    else {
        return 1;
    };

    let days = (end - start).num_days() + 1;
    u32::try_from(days.max(1)).unwrap_or(u32::MAX)
}

/// Total macros across every meal slot of a log
pub fn sum_macros(log: &DayLog) -> Macros {
    log.meals.iter().map(|(_, macros)| macros).sum()
}

/// Compute dashboard statistics for `range`
pub fn aggregate(logs: &[DayLog], settings: &UserSettings, range: &DateRange) -> AggregationResult {
    let mut filtered = filter_by_range(logs, range);
    // Summing in date order keeps totals bit-identical under input reordering
    filtered.sort_by(|a, b| a.date.cmp(&b.date));

    let daily: Vec<(&DayLog, Macros)> = filtered.iter().map(|log| (*log, sum_macros(log))).collect();

    let totals: Macros = daily.iter().map(|(_, macros)| *macros).sum();
    let total_exercise_burn: f64 = daily.iter().map(|(log, _)| log.exercise_calories).sum();

    let days_count = compute_day_count(range);
    let total_basal_burn = settings.tmb * f64::from(days_count);
    let total_burned = total_basal_burn + total_exercise_burn;

    let calorie_balance = totals.calories - total_burned;
    let basal_balance = totals.calories - total_basal_burn;
    let weight_change_kg = calorie_balance / KCAL_PER_KG;

    let log_count = daily.len();
    let daily_average = totals.per(log_count.max(1) as f64);

    let series = daily
        .iter()
        .map(|(log, macros)| DailyPoint {
            date: log.date.clone(),
            intake: macros.calories,
            expenditure: settings.tmb + log.exercise_calories,
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
        })
        .collect();

    AggregationResult {
        totals,
        total_basal_burn,
        total_exercise_burn,
        total_burned,
        calorie_balance,
        basal_balance,
        weight_change_kg,
        days_count,
        log_count,
        daily_average,
        series,
    }
}
