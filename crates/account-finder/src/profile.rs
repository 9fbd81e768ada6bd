use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "chess.com")]
    ChessCom,
    #[serde(rename = "lichess")]
    Lichess,
}

impl Platform {
    /// Accepts the spellings the front end and query strings use.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "chess.com" | "chesscom" | "chess_com" => Some(Platform::ChessCom),
            "lichess" | "lichess.org" => Some(Platform::Lichess),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::ChessCom => "chess.com",
            Platform::Lichess => "lichess",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized facts about one discovered account. Every field except the
/// handle may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformProfile {
    pub handle: String,
    pub country: Option<String>,
    pub max_rating: Option<i32>,
    pub last_active_at: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub bio_text: Option<String>,
    pub fide_rating_linked: Option<i32>,
    /// Raw text of the public profile page.
    pub profile_text: Option<String>,
    /// Birth year the platform exposes as a structured field.
    pub birth_year: Option<i32>,
}

impl PlatformProfile {
    /// Profile carrying nothing but the handle.
    pub fn bare(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(rename = "username")]
    pub handle: String,
    pub confidence: u32,
    pub matched_criteria: Vec<String>,
    pub federation: Option<String>,
    pub rating: Option<i32>,
    pub last_online: Option<String>,
}
