//! Per-platform discovery: candidate patterns in, ranked matches out.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};

use crate::hints::NameInput;
use crate::patterns::CandidateSet;
use crate::profile::{MatchResult, PlatformProfile};
use crate::ranking::rank;
use crate::scorer_trait::ConfidenceScorer;
use crate::sources::{AccountSource, DiscoveredAccount};

/// Lowercase handles already scored during one search on one platform.
#[derive(Debug, Clone, Default)]
pub struct SeenHandles {
    handles: HashSet<String>,
}

impl SeenHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the handle was already seen (case-insensitive).
    pub fn insert(&mut self, handle: &str) -> bool {
        self.handles.insert(handle.to_lowercase())
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.handles.contains(&handle.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Find, score and rank the accounts `source` knows for `candidates`.
///
/// Collaborator calls run at most `concurrency` at a time; results keep
/// candidate order so equal scores rank in discovery order.
pub async fn discover_matches(
    source: &dyn AccountSource,
    scorer: &dyn ConfidenceScorer,
    candidates: &CandidateSet,
    hints: &NameInput,
    seen: &mut SeenHandles,
    concurrency: usize,
) -> Vec<MatchResult> {
    let concurrency = concurrency.max(1);
    let platform = source.platform();

    let discovered: Vec<Vec<DiscoveredAccount>> = stream::iter(candidates.lookup_candidates().map(str::to_owned))
        .map(|pattern| async move {
            match source.discover(&pattern).await {
                Ok(accounts) => accounts,
                Err(e) => {
                    tracing::debug!(%platform, pattern = pattern.as_str(), error = %e, "Pattern lookup failed");
                    Vec::new()
                }
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let fresh = dedupe(discovered.into_iter().flatten(), seen);
    tracing::info!(%platform, accounts = fresh.len(), "Scoring discovered accounts");

    let lookups = scorer.lookups(hints);
    let scored: Vec<Option<MatchResult>> = stream::iter(fresh)
        .map(|account| async move {
            match source.fetch_profile(&account.handle, lookups).await {
                Ok(Some(profile)) => Some(scorer.score(&profile, hints, candidates)),
                Ok(None) => None,
                Err(e) if account.confirmed => {
                    tracing::warn!(%platform, handle = %account.handle, error = %e, "Profile fetch failed, scoring name only");
                    let bare = PlatformProfile::bare(&account.handle);
                    Some(scorer.score(&bare, hints, candidates))
                }
                Err(e) => {
                    tracing::debug!(%platform, handle = %account.handle, error = %e, "Direct lookup failed");
                    None
                }
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    rank(scored.into_iter().flatten().collect())
}

/// Keep the first sighting of each handle. A later confirmed sighting
/// upgrades an earlier guess.
fn dedupe(
    accounts: impl Iterator<Item = DiscoveredAccount>,
    seen: &mut SeenHandles,
) -> Vec<DiscoveredAccount> {
    let mut fresh: Vec<DiscoveredAccount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for account in accounts {
        let key = account.handle.to_lowercase();
        if seen.insert(&account.handle) {
            positions.insert(key, fresh.len());
            fresh.push(account);
        } else if account.confirmed {
            if let Some(&idx) = positions.get(&key) {
                fresh[idx].confirmed = true;
            }
        }
    }

    fresh
}
