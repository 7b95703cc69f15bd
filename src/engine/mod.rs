//! Aggregation Engine
//!
//! Turns a collection of day-logs, the user's settings and a date range into
//! dashboard statistics.
//!
//! - **aggregate**: totals, burn, balance, projected weight change, chart series
//! - **history**: per-day rows for the history table
//!
//! Everything here is a pure function. No I/O, no shared state, no errors:
//! the same inputs always produce the same output, regardless of the order
//! the logs arrive in.
//!
//! # Example
//!
//! ```rust
//! use nutritrack::engine::aggregate;
//! use nutritrack::model::{DateRange, DayLog, Macros, MealSlot, UserSettings};
//!
//! let logs = vec![DayLog::empty("2024-01-01")
//!     .meal(MealSlot::Lunch, Macros::new(1800.0, 90.0, 200.0, 60.0))
//!     .exercise(300.0)];
//! let settings = UserSettings::new(2000.0, "Ana");
//! let range = DateRange::new("2024-01-01", "2024-01-01");
//!
//! let result = aggregate(&logs, &settings, &range);
//! assert_eq!(result.calorie_balance, -500.0);
//! ```

mod aggregate;
mod history;

pub use aggregate::{
    aggregate, compute_day_count, filter_by_range, sum_macros, AggregationResult, DailyPoint,
    KCAL_PER_KG,
};
pub use history::{history, HistoryEntry};
