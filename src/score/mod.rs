pub mod recency;
pub mod tier;

use crate::types::config::ScoringWeights;
use crate::types::scoring::ScoreBreakdown;
use crate::types::signals::ClientSignals;
use tracing::debug;

pub use recency::days_since;
pub use tier::classify;

pub const JOBS_CEILING: u32 = 10;
pub const SPENDING_CEILING: f64 = 10_000.0;

pub fn breakdown(signals: &ClientSignals, weights: &ScoringWeights) -> ScoreBreakdown {
    let hiring_rate = signals
        .hiring_rate
        .map(|rate| f64::from(rate) / 100.0 * weights.hiring_rate);

    let payment_verified = signals.payment_verified.map(|verified| {
        if verified {
            weights.payment_verified
        } else {
            0.0
        }
    });

    // Linear decay: one point per elapsed day.
    let last_seen = signals.last_seen.as_deref().map(|text| {
        let days = days_since(Some(text));
        (weights.last_seen - f64::from(days)).max(0.0)
    });

    let total_jobs = signals.total_jobs.map(|jobs| {
        f64::from(jobs.min(JOBS_CEILING)) / f64::from(JOBS_CEILING) * weights.total_jobs
    });

    let total_spending = signals.total_spending.map(|spent| {
        spent.clamp(0.0, SPENDING_CEILING) / SPENDING_CEILING * weights.total_spending
    });

    let breakdown = ScoreBreakdown {
        hiring_rate,
        payment_verified,
        last_seen,
        total_jobs,
        total_spending,
    };
    debug!(?breakdown, "score breakdown");
    breakdown
}

/// Rounded sum of every present contribution. Bounded by the weight total.
pub fn score(signals: &ClientSignals, weights: &ScoringWeights) -> u32 {
    breakdown(signals, weights).total()
}

/// Post-processing step for signals from a low-fidelity source.
pub fn apply_penalty(base_score: u32, penalty: u32) -> u32 {
    base_score.saturating_sub(penalty)
}
