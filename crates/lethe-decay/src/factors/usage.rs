use lethe_core::constants::USAGE_SATURATION_COUNT;
use lethe_core::Issue;

/// Usage factor: `min(access_count / 10, 1.0)`.
///
/// Range: 0.0 – 1.0, monotone non-decreasing in the access count.
pub fn calculate(issue: &Issue) -> f64 {
    from_count(issue.access_count)
}

pub fn from_count(access_count: u64) -> f64 {
    (access_count as f64 / USAGE_SATURATION_COUNT).min(1.0)
}
