//! Max-unavailable calculation
//!
//! Converts a concurrency policy into a concrete limit for a population of
//! nodes. This is a total function: odd inputs are normalized, never rejected.

use rollout_types::MaxUnavailable;
use tracing::{info, warn};

/// Compute how many of `total_nodes` may be unavailable at once.
///
/// Percentages truncate toward zero. The result never exceeds `total_nodes`
/// and is at least 1 for a non-empty population.
pub fn compute(policy: &MaxUnavailable, total_nodes: u32) -> u32 {
    let mut max_unavailable = match policy {
        MaxUnavailable::Count(count) => *count,
        MaxUnavailable::Percent(raw) => {
            let percent = parse_percent(raw);
            (percent.saturating_mul(u64::from(total_nodes)) / 100).min(u64::from(u32::MAX)) as u32
        }
    };

    if max_unavailable > total_nodes {
        info!(
            requested = max_unavailable,
            total_nodes = total_nodes,
            "Reducing maxUnavailable to total node count"
        );
        max_unavailable = total_nodes;
    }

    // a non-empty population always allows one node through
    if total_nodes > 0 && max_unavailable < 1 {
        max_unavailable = 1;
    }

    max_unavailable
}

/// Numeric part of a percentage string. Anything unparsable counts as 0%.
fn parse_percent(raw: &str) -> u64 {
    let trimmed = raw.trim_matches('%');
    match trimmed.parse::<i64>() {
        Ok(value) => value.max(0) as u64,
        Err(_) => {
            warn!(value = %raw, "Malformed maxUnavailable percentage, treating as 0%");
            0
        }
    }
}
