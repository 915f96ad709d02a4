use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-signal contributions. A `None` term was excluded because its signal
/// was missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub hiring_rate: Option<f64>,
    pub payment_verified: Option<f64>,
    pub last_seen: Option<f64>,
    pub total_jobs: Option<f64>,
    pub total_spending: Option<f64>,
}

impl ScoreBreakdown {
    pub fn terms(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("hiring_rate", self.hiring_rate),
            ("payment_verified", self.payment_verified),
            ("last_seen", self.last_seen),
            ("total_jobs", self.total_jobs),
            ("total_spending", self.total_spending),
        ]
    }

    pub fn raw_total(&self) -> f64 {
        self.terms().iter().filter_map(|(_, term)| *term).sum()
    }

    pub fn total(&self) -> u32 {
        self.raw_total().round().max(0.0) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Poor,
    Average,
    Good,
    Excellent,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Average => "Average",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
