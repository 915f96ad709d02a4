use super::scoring::{ScoreBreakdown, Tier};
use super::signals::ClientSignals;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One scored source, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub source: String,
    pub signals: ClientSignals,
    pub breakdown: ScoreBreakdown,
    pub base_score: u32,
    pub penalty: u32,
    pub score: u32,
    pub tier: Tier,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub scored_at: DateTime<Utc>,
}
