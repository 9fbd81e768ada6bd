use crate::hints::NameInput;
use crate::patterns::CandidateSet;
use crate::profile::{MatchResult, Platform, PlatformProfile};
use crate::scorer_trait::{
    score_federation, score_fide_id_in_text, score_rating, score_specificity, ConfidenceScorer,
    ScoreCard, SecondaryLookups,
};

pub const FIDE_RATING_LINKED_WEIGHT: u32 = 25;
pub const FIDE_ID_MATCH_WEIGHT: u32 = 40;
pub const BIRTH_YEAR_WEIGHT: u32 = 30;
pub const BIRTH_YEAR_IN_BIO_WEIGHT: u32 = 10;
pub const TITLE_WEIGHT: u32 = 5;

/// Lichess profiles carry structured FIDE rating, bio and title fields, all
/// returned by the single user endpoint.
pub struct LichessScorer;

impl ConfidenceScorer for LichessScorer {
    fn platform(&self) -> Platform {
        Platform::Lichess
    }

    fn lookups(&self, _hints: &NameInput) -> SecondaryLookups {
        SecondaryLookups::default()
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

        // Identity
        score_fide_id_in_text(&mut card, profile, hints);
        if let Some(linked) = profile.fide_rating_linked {
            card.add(FIDE_RATING_LINKED_WEIGHT, "FIDE Rating");
            if hints.fide_id() == Some(linked.to_string().as_str()) {
                card.add(FIDE_ID_MATCH_WEIGHT, "FIDE ID Match");
            }
        }
        if let Some(year) = hints.birth_year() {
            if profile.birth_year == Some(year) {
                card.add(BIRTH_YEAR_WEIGHT, "Birth Year");
            }
            let in_bio = profile
                .bio_text
                .as_deref()
                .is_some_and(|bio| bio.contains(&year.to_string()));
            if in_bio {
                card.add(BIRTH_YEAR_IN_BIO_WEIGHT, "Birth Year in Bio");
            }
        }

        if let Some(title) = profile.title.as_deref().filter(|t| !t.is_empty()) {
            card.add(TITLE_WEIGHT, format!("{title} Title"));
        }

        score_specificity(&mut card, profile, candidates);
        card.finish(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternGenerator;

    fn candidates(input: &NameInput) -> CandidateSet {
        PatternGenerator::with_year(2026).generate(input).unwrap()
    }

    #[test]
    fn test_missing_data_degrades_to_base() {
        let input = NameInput::new("Jane Doe")
            .unwrap()
            .with_federation(Some("NOR"))
            .with_fide_rating(Some(2100))
            .with_birth_year(Some(2001));
        let result = LichessScorer.score(&PlatformProfile::bare("janedoe"), &input, &candidates(&input));
        assert_eq!(result.confidence, 20);
        assert_eq!(result.matched_criteria, vec!["Name pattern"]);
        assert_eq!(result.last_online, None);
    }

    #[test]
    fn test_linked_fide_rating_and_id_match() {
        let input = NameInput::new("Jane Doe").unwrap().with_fide_id(Some("2450"));
        let profile = PlatformProfile {
            handle: "not_a_pattern_handle".into(),
            fide_rating_linked: Some(2450),
            ..Default::default()
        };

        let result = LichessScorer.score(&profile, &input, &candidates(&input));
        assert_eq!(result.matched_criteria, vec!["Name pattern", "FIDE Rating", "FIDE ID Match"]);
        assert_eq!(result.confidence, 20 + 25 + 40);
    }

    #[test]
    fn test_birth_year_structured_and_bio_both_apply() {
        let input = NameInput::new("Jane Doe").unwrap().with_birth_year(Some(2001));
        let profile = PlatformProfile {
            handle: "janedoe".into(),
            birth_year: Some(2001),
            bio_text: Some("Chess fan since 2001".into()),
            ..Default::default()
        };

        let result = LichessScorer.score(&profile, &input, &candidates(&input));
        assert_eq!(
            result.matched_criteria,
            vec!["Name pattern", "Birth Year", "Birth Year in Bio"]
        );
        // 20 + 30 + 10 + specificity 10
        assert_eq!(result.confidence, 70);
    }

    #[test]
    fn test_title_and_signal_order() {
        let input = NameInput::new("Jane Doe")
            .unwrap()
            .with_federation(Some("Norway"))
            .with_fide_rating(Some(2300));
        let profile = PlatformProfile {
            handle: "other".into(),
            country: Some("norwy".into()),
            max_rating: Some(2150),
            title: Some("FM".into()),
            last_active_at: chrono::DateTime::from_timestamp(1_700_000_000, 0),
            ..Default::default()
        };

        let result = LichessScorer.score(&profile, &input, &candidates(&input));
        assert_eq!(
            result.matched_criteria,
            vec!["Name pattern", "Similar Federation", "Rating", "FM Title"]
        );
        assert_eq!(result.confidence, 20 + 15 + 15 + 5);
        assert_eq!(result.last_online.as_deref(), Some("2023-11-14"));
    }

    #[test]
    fn test_no_secondary_lookups() {
        let input = NameInput::new("Jane Doe").unwrap().with_fide_id(Some("1"));
        assert_eq!(LichessScorer.lookups(&input), SecondaryLookups::default());
    }
}
