//! NutriTrack data model
//!
//! Value and entity types shared by every layer:
//!
//! - **types**: `Macros`, `MealSlot`, `Meals`, `DayLog`, `UserSettings`, `DateRange`
//! - **lenient**: forgiving decoders for persisted documents
//! - **error**: validation errors raised at the presentation boundary
//!
//! Decoding never fails on bad numbers. A missing, `null`, non-numeric or
//! non-finite macro field reads back as zero so a partially corrupt document
//! still renders on the dashboard.

pub mod error;
pub(crate) mod lenient;
pub mod types;

pub use error::ValidationError;
pub use types::{
    format_date, parse_date, DateRange, DayLog, Macros, MealSlot, Meals, UserSettings,
    DATE_FORMAT, DEFAULT_TMB, MAX_RANGE_DAYS, MAX_TMB, MIN_TMB,
};
