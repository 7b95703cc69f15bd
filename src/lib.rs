//! # NutriTrack
//!
//! Personal calorie and macronutrient tracking. Users log meals per day,
//! record exercise, and see their energy balance and projected weight change
//! over a date range.
//!
//! ## Features
//!
//! - **Aggregation engine**: pure, order-independent dashboard statistics
//! - **Local-first**: every change lands in an on-device SQLite mirror first
//! - **Remote sync**: optional JSON document store, last writer wins
//! - **Insights**: written summaries from a text-generation service
//!
//! ## Modules
//!
//! - [`model`]: day-logs, meals, macros, settings and date ranges
//! - [`engine`]: aggregation and history
//! - [`store`]: remote day-log store
//! - [`mirror`]: local key/value mirror
//! - [`insight`]: text-generation client
//! - [`tracker`]: session orchestration
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nutritrack::{Config, DateRange, DayLog, Macros, MealSlot, Tracker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let tracker = Tracker::from_config(&config)?;
//!     tracker.load().await;
//!
//!     let log = DayLog::empty("2024-01-15")
//!         .meal(MealSlot::Lunch, Macros::new(650.0, 40.0, 70.0, 20.0))
//!         .exercise(300.0);
//!     tracker.save_log(log).await?;
//!
//!     let range = DateRange::new("2024-01-09", "2024-01-15");
//!     let dashboard = tracker.dashboard(&range).await;
//!     println!("Projected change: {:.2} kg", dashboard.weight_change_kg);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod export;
pub mod insight;
pub mod logging;
pub mod mirror;
pub mod model;
pub mod store;
pub mod tracker;

pub use model::{
    DateRange, DayLog, Macros, MealSlot, Meals, UserSettings, ValidationError, DEFAULT_TMB,
};

pub use engine::{aggregate, history, AggregationResult, DailyPoint, HistoryEntry, KCAL_PER_KG};

pub use store::{DayLogStore, HttpDocumentStore, MemoryStore, StoreError, UserData};

pub use mirror::{LocalMirror, MirrorError};

pub use insight::InsightClient;

pub use tracker::{LoadOutcome, SyncStatus, Tracker, TrackerError, TrackerStatus, WriteOutcome};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
