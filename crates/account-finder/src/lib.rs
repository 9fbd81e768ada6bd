//! Finds a player's chess.com and Lichess accounts from a real name.
//!
//! The pipeline: `patterns::generate()` turns the name and hints into a set
//! of candidate handles, `discovery::discover_matches()` asks a platform
//! source which of them exist, and a per-platform `ConfidenceScorer` rates
//! every discovered account. Results come back ranked by confidence.

pub mod discovery;
pub mod error;
pub mod federation;
pub mod hints;
pub mod patterns;
pub mod profile;
pub mod ranking;
pub mod scorer_trait;
pub mod scorers;
pub mod sources;

pub use error::FinderError;
pub use hints::{NameInput, ReferenceInfo};
pub use patterns::{generate, CandidateSet, PatternGenerator};
pub use profile::{MatchResult, Platform, PlatformProfile};
pub use ranking::rank;
pub use scorer_trait::{ConfidenceScorer, SecondaryLookups};

/// Shortest handle worth querying a platform for.
pub const MIN_LOOKUP_LEN: usize = 3;
