//! Core data types for NutriTrack
//!
//! - `Macros`: calories and macronutrients, a plain value
//! - `MealSlot`: the closed set of meal categories
//! - `Meals`: one `Macros` per slot, always complete
//! - `DayLog`: everything logged for one calendar date
//! - `UserSettings`: the per-user BMR and display name
//! - `DateRange`: inclusive ISO date bounds for the dashboard

use crate::model::error::ValidationError;
use crate::model::lenient::{number_or_zero, or_default, string_or_empty};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Date format used for every persisted date key
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// BMR assigned to a user who has not configured one (kcal/day)
pub const DEFAULT_TMB: f64 = 2700.0;

/// Lowest BMR accepted from user input (kcal/day)
pub const MIN_TMB: f64 = 500.0;

/// Highest BMR accepted from user input (kcal/day)
pub const MAX_TMB: f64 = 5000.0;

/// Longest default window, in days, that `DateRange::last_days` will build
pub const MAX_RANGE_DAYS: i64 = 36_500;

/// Calories and macronutrients
///
/// Calories are kilocalories; protein, carbs and fat are grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub calories: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub protein: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub fat: f64,
}

impl Macros {
    pub const ZERO: Macros = Macros {
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
    };

    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Divide every field by `n`
    pub fn per(self, n: f64) -> Self {
        Self {
            calories: self.calories / n,
            protein: self.protein / n,
            carbs: self.carbs / n,
            fat: self.fat / n,
        }
    }

    /// Check every field is a finite, non-negative number
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ] {
            check_quantity(field, value)?;
        }
        Ok(())
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

/// Parses `calories[,protein[,carbs[,fat]]]`; omitted fields are zero
impl FromStr for Macros {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = [0.0; 4];
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() > values.len() {
            return Err(ValidationError::MalformedMacros(s.to_string()));
        }

        let fields = ["calories", "protein", "carbs", "fat"];
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            let value: f64 = part.parse().map_err(|_| ValidationError::NotANumber {
                field: fields[i].to_string(),
                text: part.to_string(),
            })?;
            check_quantity(fields[i], value)?;
            values[i] = value;
        }

        Ok(Macros::new(values[0], values[1], values[2], values[3]))
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Self {
        iter.fold(Macros::ZERO, Add::add)
    }
}

/// Meal category
///
/// The aliases are the keys written by earlier versions of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    #[serde(alias = "Café da Manhã")]
    Breakfast,
    #[serde(alias = "Almoço")]
    Lunch,
    #[serde(alias = "Jantar")]
    Dinner,
    #[serde(alias = "Lanche")]
    Snack,
}

impl MealSlot {
    /// All slots in display order
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" => Ok(MealSlot::Snack),
            _ => Err(ValidationError::UnknownMeal(s.to_string())),
        }
    }
}

/// One `Macros` entry per meal slot
///
/// Every slot is always present. Slots missing from a stored document, or
/// stored as something other than a macros object, read back as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Meals {
    #[serde(default, alias = "Café da Manhã", deserialize_with = "or_default")]
    pub breakfast: Macros,
    #[serde(default, alias = "Almoço", deserialize_with = "or_default")]
    pub lunch: Macros,
    #[serde(default, alias = "Jantar", deserialize_with = "or_default")]
    pub dinner: Macros,
    #[serde(default, alias = "Lanche", deserialize_with = "or_default")]
    pub snack: Macros,
}

impl Meals {
    pub fn get(&self, slot: MealSlot) -> Macros {
        match slot {
            MealSlot::Breakfast => self.breakfast,
            MealSlot::Lunch => self.lunch,
            MealSlot::Dinner => self.dinner,
            MealSlot::Snack => self.snack,
        }
    }

    pub fn set(&mut self, slot: MealSlot, macros: Macros) {
        match slot {
            MealSlot::Breakfast => self.breakfast = macros,
            MealSlot::Lunch => self.lunch = macros,
            MealSlot::Dinner => self.dinner = macros,
            MealSlot::Snack => self.snack = macros,
        }
    }

    /// Builder: set one slot
    pub fn with(mut self, slot: MealSlot, macros: Macros) -> Self {
        self.set(slot, macros);
        self
    }

    /// Iterate slots in display order
    pub fn iter(&self) -> impl Iterator<Item = (MealSlot, Macros)> + '_ {
        MealSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}

/// Everything logged for one calendar date
///
/// Unique per (user, date). Saved and replaced as a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLog {
    /// `YYYY-MM-DD`; also the document key
    #[serde(default, deserialize_with = "string_or_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "or_default")]
    pub meals: Meals,
    /// Kilocalories burned through logged activity
    #[serde(
        rename = "exerciseCalories",
        default,
        deserialize_with = "number_or_zero"
    )]
    pub exercise_calories: f64,
}

impl DayLog {
    /// A blank log for `date`: every slot zero, no exercise
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            meals: Meals::default(),
            exercise_calories: 0.0,
        }
    }

    /// Builder: set one meal slot
    pub fn meal(mut self, slot: MealSlot, macros: Macros) -> Self {
        self.meals.set(slot, macros);
        self
    }

    /// Builder: set exercise calories
    pub fn exercise(mut self, calories: f64) -> Self {
        self.exercise_calories = calories;
        self
    }

    /// Validate the date key and every quantity
    pub fn validate(&self) -> Result<(), ValidationError> {
        parse_date(&self.date)?;
        for (_, macros) in self.meals.iter() {
            macros.validate()?;
        }
        check_quantity("exerciseCalories", self.exercise_calories)
    }
}

/// Per-user settings, a singleton document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Basal metabolic rate, kcal/day
    #[serde(default = "default_tmb", deserialize_with = "tmb_or_default")]
    pub tmb: f64,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
}

fn default_tmb() -> f64 {
    DEFAULT_TMB
}

/// A BMR that is missing, malformed or not positive falls back to the default.
fn tmb_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let tmb = number_or_zero(deserializer)?;
    Ok(if tmb > 0.0 { tmb } else { DEFAULT_TMB })
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            tmb: DEFAULT_TMB,
            name: "User".to_string(),
        }
    }
}

impl UserSettings {
    pub fn new(tmb: f64, name: impl Into<String>) -> Self {
        Self {
            tmb,
            name: name.into(),
        }
    }

    /// Enforce the bounds the entry form accepts
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_TMB..=MAX_TMB).contains(&self.tmb) {
            return Err(ValidationError::TmbOutOfRange {
                value: self.tmb,
                min: MIN_TMB,
                max: MAX_TMB,
            });
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Inclusive date range `[start_date, end_date]`
///
/// No ordering invariant is enforced here; see [`DateRange::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// `[today - days, today]`
    ///
    /// `days` is clamped to `0..=MAX_RANGE_DAYS`.
    pub fn last_days(days: i64, today: NaiveDate) -> Self {
        let days = days.clamp(0, MAX_RANGE_DAYS);
        let start = today
            .checked_sub_signed(Duration::days(days))
            .unwrap_or(NaiveDate::MIN);
        Self::new(format_date(start), format_date(today))
    }

    /// Build a range from optional bounds, defaulting either side to the
    /// `last_days(default_days, today)` window, then validate it.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
        default_days: i64,
    ) -> Result<Self, ValidationError> {
        let fallback = Self::last_days(default_days, today);
        let range = Self::new(
            start.map(str::to_string).unwrap_or(fallback.start_date),
            end.map(str::to_string).unwrap_or(fallback.end_date),
        );
        range.validate()?;
        Ok(range)
    }

    /// Lexicographic containment; valid for zero-padded ISO dates
    pub fn contains(&self, date: &str) -> bool {
        date >= self.start_date.as_str() && date <= self.end_date.as_str()
    }

    pub fn is_inverted(&self) -> bool {
        self.start_date > self.end_date
    }

    /// Reject malformed or inverted ranges
    pub fn validate(&self) -> Result<(NaiveDate, NaiveDate), ValidationError> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        if start > end {
            return Err(ValidationError::InvertedRange {
                start: self.start_date.clone(),
                end: self.end_date.clone(),
            });
        }
        Ok((start, end))
    }
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    // chrono accepts unpadded fields; the key must stay lexicographically sortable
    if s.len() != 10 {
        return Err(ValidationError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn check_quantity(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidQuantity {
            field: field.to_string(),
            value,
        })
    }
}
