use crate::hints::NameInput;
use crate::patterns::CandidateSet;
use crate::profile::{MatchResult, Platform, PlatformProfile};
use crate::scorer_trait::{
    score_federation, score_fide_id_in_text, score_rating, score_specificity, ConfidenceScorer,
    ScoreCard, SecondaryLookups,
};

pub const BIRTH_YEAR_IN_TEXT_WEIGHT: u32 = 20;

/// chess.com exposes no structured FIDE data, so identity evidence comes
/// from searching the public profile page.
pub struct ChessComScorer;

impl ConfidenceScorer for ChessComScorer {
    fn platform(&self) -> Platform {
        Platform::ChessCom
    }

    fn lookups(&self, hints: &NameInput) -> SecondaryLookups {
        SecondaryLookups {
            stats: true,
            profile_page: hints.fide_id().is_some() || hints.birth_year().is_some(),
        }
    }

    fn score(
        &self,
        profile: &PlatformProfile,
        hints: &NameInput,
        candidates: &CandidateSet,
    ) -> MatchResult {
        let mut card = ScoreCard::new();

        score_federation(&mut card, profile, hints);
        score_rating(&mut card, profile, hints);
        score_fide_id_in_text(&mut card, profile, hints);

        if let (Some(text), Some(year)) = (profile.profile_text.as_deref(), hints.birth_year()) {
            if text.contains(&year.to_string()) {
                card.add(BIRTH_YEAR_IN_TEXT_WEIGHT, "Birth Year");
            }
        }

        score_specificity(&mut card, profile, candidates);
        card.finish(profile)
    }
}
