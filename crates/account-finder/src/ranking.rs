use crate::profile::MatchResult;

/// Sort by confidence, highest first. Stable: equal scores keep discovery order.
pub fn rank(mut results: Vec<MatchResult>) -> Vec<MatchResult> {
    results.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    results
}
