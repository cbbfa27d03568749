//! Insight threshold configuration
//!
//! Config is loaded with a layered resolution:
//! 1. An explicit path, when given (e.g. `--config`)
//! 2. The override in the data dir (~/.local/share/gradelens/config/insights.toml)
//! 3. The embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default values. An unreadable data dir
//! override falls back to the embedded defaults with a warning.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/insights.toml");

/// Thresholds used by the insight engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Scores below this count as failing (risk identifier default)
    pub failing_threshold: f64,
    /// Averages below this are high risk
    pub high_risk_below: f64,
    /// Consecutive-score jump above which an improvement is flagged
    pub sudden_improvement_increase: f64,
    /// Jumps above this are high severity
    pub high_severity_increase: f64,
    /// Scores at or above this count as perfect
    pub perfect_score: f64,
    /// How many perfect scores trigger an anomaly
    pub perfect_score_count: usize,
    /// Best-minus-worst spread above which performance is inconsistent
    pub variability_range: f64,
    /// Class summary: averages below this need attention
    pub attention_below: f64,
    /// Class summary: averages at or above this pass
    pub pass_mark: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            failing_threshold: 60.0,
            high_risk_below: 50.0,
            sudden_improvement_increase: 40.0,
            high_severity_increase: 50.0,
            perfect_score: 99.0,
            perfect_score_count: 3,
            variability_range: 30.0,
            attention_below: 60.0,
            pass_mark: 50.0,
        }
    }
}

impl InsightConfig {
    /// Load config, preferring `override_path`, then the data dir override,
    /// then the embedded defaults
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => match fs::read_to_string(&path) {
                    Ok(content) => {
                        debug!(path = %path.display(), "Using insight config override");
                        content
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Unreadable config override, using defaults");
                        DEFAULT_CONFIG.to_string()
                    }
                },
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// The embedded defaults, parsed
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("gradelens").join("config").join("insights.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    risk: Option<RawRisk>,
    anomaly: Option<RawAnomaly>,
    recommendation: Option<RawRecommendation>,
    class_summary: Option<RawClassSummary>,
}

#[derive(Debug, Deserialize)]
struct RawRisk {
    failing_threshold: Option<f64>,
    high_risk_below: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAnomaly {
    sudden_improvement_increase: Option<f64>,
    high_severity_increase: Option<f64>,
    perfect_score: Option<f64>,
    perfect_score_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    variability_range: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawClassSummary {
    attention_below: Option<f64>,
    pass_mark: Option<f64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<InsightConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = InsightConfig::default();

    if let Some(risk) = raw.risk {
        if let Some(v) = risk.failing_threshold {
            config.failing_threshold = v;
        }
        if let Some(v) = risk.high_risk_below {
            config.high_risk_below = v;
        }
    }

    if let Some(anomaly) = raw.anomaly {
        if let Some(v) = anomaly.sudden_improvement_increase {
            config.sudden_improvement_increase = v;
        }
        if let Some(v) = anomaly.high_severity_increase {
            config.high_severity_increase = v;
        }
        if let Some(v) = anomaly.perfect_score {
            config.perfect_score = v;
        }
        if let Some(v) = anomaly.perfect_score_count {
            config.perfect_score_count = v;
        }
    }

    if let Some(rec) = raw.recommendation {
        if let Some(v) = rec.variability_range {
            config.variability_range = v;
        }
    }

    if let Some(summary) = raw.class_summary {
        if let Some(v) = summary.attention_below {
            config.attention_below = v;
        }
        if let Some(v) = summary.pass_mark {
            config.pass_mark = v;
        }
    }

    Ok(config)
}
