//! Insight Client
//!
//! Turns an aggregation into a short written summary using an external
//! text-generation service. The call never fails from the caller's point of
//! view; problems come back as fixed, displayable messages.

mod client;
mod prompt;

pub use client::{InsightClient, EMPTY_MESSAGE, FAILURE_MESSAGE, NOT_CONFIGURED_MESSAGE};
pub use prompt::{build_prompt, AnalysisData, RoundedMacros};
