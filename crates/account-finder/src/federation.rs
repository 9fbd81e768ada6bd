//! Coarse federation/country comparison.

use std::collections::HashSet;

/// Similarity at or above which two federations count as "similar".
pub const SIMILAR_FEDERATION_THRESHOLD: f64 = 0.5;

/// Jaccard index of the lowercase character sets of `a` and `b`.
/// Coarse: unrelated names that share letters can score high.
pub fn similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<char> = a.to_lowercase().chars().collect();
    let set_b: HashSet<char> = b.to_lowercase().chars().collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

pub fn is_exact_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

pub fn is_similar(a: &str, b: &str) -> bool {
    similarity(a, b) >= SIMILAR_FEDERATION_THRESHOLD
}
