//! Gradelens Core Library
//!
//! Shared functionality for the Gradelens student insight tool:
//! - Read access to the approved assessment record store
//! - Insight engine (trend prediction, risk, recommendations, anomalies,
//!   comparative standing, final-grade prediction, grade alignment)
//! - Grade scale shared by the analyses
//! - Threshold configuration with file overrides

pub mod config;
pub mod db;
pub mod error;
pub mod grading;
pub mod insights;
pub mod models;

/// Fixture helpers for staging students, subjects and results
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::InsightConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use grading::Grade;
pub use insights::InsightEngine;
