use crate::types::config::ScoreThresholds;
use crate::types::scoring::Tier;

/// Highest tier whose cut point is at or below `score`.
pub fn classify(score: u32, thresholds: &ScoreThresholds) -> Tier {
    if thresholds
        .excellent
        .is_some_and(|excellent| score >= excellent)
    {
        Tier::Excellent
    } else if score >= thresholds.good {
        Tier::Good
    } else if score >= thresholds.average {
        Tier::Average
    } else {
        Tier::Poor
    }
}
