use serde::{Deserialize, Serialize};

/// Client reputation signals pulled from a job posting. Every field is
/// independently optional; `None` means the signal was not found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSignals {
    pub hiring_rate: Option<u8>,
    /// `Some(false)` when no verification marker was present; the markup has
    /// no explicit "unverified" signal.
    pub payment_verified: Option<bool>,
    pub last_seen: Option<String>,
    pub total_jobs: Option<u32>,
    pub total_spending: Option<f64>,
}

impl ClientSignals {
    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }

    pub fn present_count(&self) -> usize {
        [
            self.hiring_rate.is_some(),
            self.payment_verified.is_some(),
            self.last_seen.is_some(),
            self.total_jobs.is_some(),
            self.total_spending.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Where a record's signals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    /// Full job detail page.
    Page,
    /// Compact search-result card or fallback data.
    Card,
}

impl Fidelity {
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::Card)
    }
}
