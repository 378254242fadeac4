//! Spread recommendation engine: an immutable, locale-aware spread catalog plus a
//! deterministic scorer that picks and explains the best layout for a question.

pub mod catalog;
pub mod config;
pub mod error;
pub mod recommendation;
pub mod telemetry;
