//! Shared scoring contract and the signals both platforms evaluate.

use crate::federation;
use crate::hints::NameInput;
use crate::patterns::CandidateSet;
use crate::profile::{MatchResult, Platform, PlatformProfile};

/// Every discovered handle already matched a generated pattern.
pub const BASE_CONFIDENCE: u32 = 20;
pub const MAX_CONFIDENCE: u32 = 100;
pub const NAME_PATTERN_LABEL: &str = "Name pattern";

pub const FEDERATION_WEIGHT: u32 = 25;
pub const SIMILAR_FEDERATION_WEIGHT: u32 = 15;
pub const FIDE_ID_IN_TEXT_WEIGHT: u32 = 35;
pub const SPECIFICITY_WEIGHT: u32 = 10;

/// Secondary fetches the profile collaborator should run for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecondaryLookups {
    /// Per-time-control rating endpoint.
    pub stats: bool,
    /// Full public profile page, searched for FIDE id and birth year.
    pub profile_page: bool,
}

/// Trait that both platform scorers implement.
pub trait ConfidenceScorer: Send + Sync {
    fn platform(&self) -> Platform;

    /// Which secondary lookups are worth their request cost for these hints.
    fn lookups(&self, hints: &NameInput) -> SecondaryLookups;

    /// Score one account. Pure: every missing field means "no bonus".
    fn score(
        &self,
        profile: &PlatformProfile,
        hints: &NameInput,
        candidates: &CandidateSet,
    ) -> MatchResult;
}

/// Running confidence and matched labels for one scoring call.
#[derive(Debug, Clone)]
pub struct ScoreCard {
    confidence: u32,
    criteria: Vec<String>,
    signals: usize,
}

impl Default for ScoreCard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreCard {
    pub fn new() -> Self {
        Self {
            confidence: BASE_CONFIDENCE,
            criteria: vec![NAME_PATTERN_LABEL.to_string()],
            signals: 0,
        }
    }

    pub fn add(&mut self, weight: u32, label: impl Into<String>) {
        self.confidence += weight;
        self.criteria.push(label.into());
        self.signals += 1;
    }

    /// Signals matched beyond the base name pattern.
    pub fn signals(&self) -> usize {
        self.signals
    }

    pub fn finish(self, profile: &PlatformProfile) -> MatchResult {
        MatchResult {
            handle: profile.handle.clone(),
            confidence: self.confidence.min(MAX_CONFIDENCE),
            matched_criteria: self.criteria,
            federation: profile.country.clone(),
            rating: profile.max_rating,
            last_online: profile
                .last_active_at
                .map(|t| t.format("%Y-%m-%d").to_string()),
        }
    }
}

pub fn score_federation(card: &mut ScoreCard, profile: &PlatformProfile, hints: &NameInput) {
    let (Some(country), Some(fed)) = (profile.country.as_deref(), hints.federation()) else {
        return;
    };
    if federation::is_exact_match(country, fed) {
        card.add(FEDERATION_WEIGHT, "Federation");
    } else if federation::is_similar(country, fed) {
        card.add(SIMILAR_FEDERATION_WEIGHT, "Similar Federation");
    }
}

/// Weight and label for the tightest bracket containing `diff`.
pub fn rating_bracket(diff: u32) -> Option<(u32, &'static str)> {
    match diff {
        0..=50 => Some((35, "Very Similar Rating")),
        51..=100 => Some((25, "Similar Rating")),
        101..=200 => Some((15, "Rating")),
        201..=300 => Some((5, "Distant Rating")),
        _ => None,
    }
}

pub fn score_rating(card: &mut ScoreCard, profile: &PlatformProfile, hints: &NameInput) {
    let (Some(rating), Some(fide)) = (profile.max_rating, hints.fide_rating()) else {
        return;
    };
    if let Some((weight, label)) = rating_bracket(rating.abs_diff(fide)) {
        card.add(weight, label);
    }
}

pub fn score_fide_id_in_text(card: &mut ScoreCard, profile: &PlatformProfile, hints: &NameInput) {
    let (Some(text), Some(fide_id)) = (profile.profile_text.as_deref(), hints.fide_id()) else {
        return;
    };
    if text.contains(fide_id) {
        card.add(FIDE_ID_IN_TEXT_WEIGHT, "FIDE ID");
    }
}

/// Applies only on top of some other evidence; carries no label.
pub fn score_specificity(card: &mut ScoreCard, profile: &PlatformProfile, candidates: &CandidateSet) {
    if card.signals() > 0 && candidates.contains_ignore_case(&profile.handle) {
        card.confidence += SPECIFICITY_WEIGHT;
    }
}
