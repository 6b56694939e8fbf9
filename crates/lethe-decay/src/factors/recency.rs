use chrono::{DateTime, Utc};

use lethe_core::constants::DAYS_PER_YEAR;
use lethe_core::Issue;

/// Recency factor: `exp(-λ * days / 365)` where `days` runs from the last
/// access (creation time if never accessed) to `now`.
///
/// Range: 0.0 – 1.0. Timestamps in the future count as zero days.
pub fn calculate(issue: &Issue, now: DateTime<Utc>, decay_rate: f64) -> f64 {
    let days = days_between(issue.last_access_or_creation(), now);
    (-decay_rate * days / DAYS_PER_YEAR).exp()
}

/// Fractional days from `then` to `now`, clamped at zero.
pub fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - then).num_seconds().max(0) as f64 / 86_400.0
}
