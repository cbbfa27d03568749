//! Insight Engine - a stateless service over the record store

use crate::config::InsightConfig;
use crate::db::Database;

/// Runs analyses against a record store
///
/// Holds only a store handle and thresholds. Each analysis method lives in
/// its own module as an `impl InsightEngine` block.
pub struct InsightEngine<'a> {
    pub(crate) db: &'a Database,
    pub(crate) config: InsightConfig,
}

impl<'a> InsightEngine<'a> {
    /// Engine with default thresholds
    pub fn new(db: &'a Database) -> Self {
        Self::with_config(db, InsightConfig::default())
    }

    /// Engine with custom thresholds
    pub fn with_config(db: &'a Database, config: InsightConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }
}
