use std::fmt;

use serde::Serialize;

/// Qualitative level of the mean parental income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    High,
    Medium,
    Low,
}

/// Mean strictly above this is `High`.
pub const HIGH_THRESHOLD: f64 = 7_500_000.0;
/// Mean strictly below this is `Low`.
pub const LOW_THRESHOLD: f64 = 2_000_000.0;

/// Classify a mean income. Both thresholds are exclusive, so a mean of
/// exactly 7.5M or 2M is `Medium`. An undefined (NaN or infinite) mean has
/// no tier.
pub fn classify(mean: f64) -> Option<Tier> {
    if !mean.is_finite() {
        return None;
    }
    let tier = if mean > HIGH_THRESHOLD {
        Tier::High
    } else if mean < LOW_THRESHOLD {
        Tier::Low
    } else {
        Tier::Medium
    };
    Some(tier)
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        })
    }
}
