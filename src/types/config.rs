use crate::error::ScoreError;
use serde::{Deserialize, Serialize};

pub const EXPECTED_WEIGHT_TOTAL: f64 = 100.0;
pub const DEFAULT_DEGRADED_PENALTY: u32 = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enabled: bool,
    pub weights: ScoringWeights,
    pub thresholds: ScoreThresholds,
    pub scoring: ScoringConfig,
    pub retrieval: RetrievalConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            weights: ScoringWeights::default(),
            thresholds: ScoreThresholds::default(),
            scoring: ScoringConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

/// Maximum attainable points per signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub hiring_rate: f64,
    pub payment_verified: f64,
    pub last_seen: f64,
    pub total_jobs: f64,
    pub total_spending: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            hiring_rate: 40.0,
            payment_verified: 15.0,
            last_seen: 20.0,
            total_jobs: 10.0,
            total_spending: 15.0,
        }
    }
}

impl ScoringWeights {
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("hiring_rate", self.hiring_rate),
            ("payment_verified", self.payment_verified),
            ("last_seen", self.last_seen),
            ("total_jobs", self.total_jobs),
            ("total_spending", self.total_spending),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, weight)| weight).sum()
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        for (name, weight) in self.entries() {
            if !weight.is_finite() || !(0.0..=EXPECTED_WEIGHT_TOTAL).contains(&weight) {
                return Err(ScoreError::InvalidConfig(format!(
                    "weights.{name} must be between 0 and {EXPECTED_WEIGHT_TOTAL} (found {weight})"
                )));
            }
        }
        let total = self.total();
        if (total - EXPECTED_WEIGHT_TOTAL).abs() > 0.001 {
            return Err(ScoreError::InvalidConfig(format!(
                "weights must sum to {EXPECTED_WEIGHT_TOTAL} (found {total:.3})"
            )));
        }
        Ok(())
    }
}

/// Ascending cut points partitioning [0, 100] into tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    pub average: u32,
    pub good: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excellent: Option<u32>,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            average: 50,
            good: 75,
            excellent: None,
        }
    }
}

impl ScoreThresholds {
    pub fn validate(&self) -> Result<(), ScoreError> {
        let mut cuts = vec![("average", self.average), ("good", self.good)];
        if let Some(excellent) = self.excellent {
            cuts.push(("excellent", excellent));
        }

        for (name, cut) in &cuts {
            if *cut > 100 {
                return Err(ScoreError::InvalidConfig(format!(
                    "thresholds.{name} must be between 0 and 100 (found {cut})"
                )));
            }
        }
        for pair in cuts.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if upper <= lower {
                return Err(ScoreError::InvalidConfig(format!(
                    "thresholds.{upper_name} ({upper}) must be greater than thresholds.{lower_name} ({lower})"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub degraded_penalty: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            degraded_penalty: DEFAULT_DEGRADED_PENALTY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("clientscore/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ScoreError> {
        self.weights.validate()?;
        self.thresholds.validate()?;

        if self.scoring.degraded_penalty > 100 {
            return Err(ScoreError::InvalidConfig(format!(
                "scoring.degraded_penalty must be between 0 and 100 (found {})",
                self.scoring.degraded_penalty
            )));
        }
        if self.retrieval.timeout_secs == 0 {
            return Err(ScoreError::InvalidConfig(
                "retrieval.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.retrieval.user_agent.trim().is_empty() {
            return Err(ScoreError::InvalidConfig(
                "retrieval.user_agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
