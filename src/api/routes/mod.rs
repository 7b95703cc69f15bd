//! API route handlers

pub mod dashboard;
pub mod health;
pub mod identity;
pub mod insights;
pub mod logs;
pub mod settings;
pub mod sync;
