use std::time::Duration;

use account_finder::sources::{AccountSource, DiscoveredAccount, FetchError};
use account_finder::{Platform, PlatformProfile, SecondaryLookups};
use async_trait::async_trait;
use chess_core::GameRecord;
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;

use super::{get_json, GameSource};
use crate::error::AppError;

const PERF_KEYS: [&str; 4] = ["classical", "rapid", "blitz", "bullet"];

pub struct LichessClient {
    client: Client,
    base_url: String,
}

impl LichessClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_user(&self, username: &str) -> Result<Option<Value>, FetchError> {
        let url = format!("{}/api/user/{}", self.base_url, username);
        get_json(&self.client, &url).await
    }

    /// Raw PGNs of a user's most recent games, newest first.
    pub async fn fetch_user_pgns(&self, username: &str, max_games: usize) -> Result<Vec<String>, AppError> {
        let url = format!("{}/api/games/user/{}", self.base_url, username);
        let params = [
            ("pgnInJson", "true".to_string()),
            ("max", max_games.to_string()),
        ];

        // Rate limit
        tokio::time::sleep(Duration::from_secs(1)).await;

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept", "application/x-ndjson")
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request error: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Player not found: {username}")));
        }
        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!("HTTP {}", resp.status())));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Body read error: {e}")))?;

        Ok(pgns_from_ndjson(&text))
    }
}

#[async_trait]
impl AccountSource for LichessClient {
    fn platform(&self) -> Platform {
        Platform::Lichess
    }

    /// Autocomplete hits are confirmed accounts; the pattern itself is kept
    /// as a direct-lookup guess.
    async fn discover(&self, pattern: &str) -> Result<Vec<DiscoveredAccount>, FetchError> {
        let url = format!("{}/api/player/autocomplete", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("term", pattern), ("object", "false")])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let mut found: Vec<DiscoveredAccount> = if resp.status().is_success() {
            let data: Value = resp
                .json()
                .await
                .map_err(|e| FetchError::Parse(e.to_string()))?;
            autocomplete_handles(&data)
                .into_iter()
                .map(|h| DiscoveredAccount::confirmed(&h))
                .collect()
        } else {
            tracing::debug!(pattern, status = %resp.status(), "Autocomplete failed");
            Vec::new()
        };

        if !found
            .iter()
            .any(|a| a.handle.eq_ignore_ascii_case(pattern))
        {
            found.push(DiscoveredAccount::guess(pattern));
        }
        Ok(found)
    }

    async fn fetch_profile(
        &self,
        handle: &str,
        _lookups: SecondaryLookups,
    ) -> Result<Option<PlatformProfile>, FetchError> {
        Ok(self
            .fetch_user(handle)
            .await?
            .map(|user| profile_from_user(handle, &user)))
    }
}

#[async_trait]
impl GameSource for LichessClient {
    async fn fetch_games(&self, handle: &str, limit: usize) -> Result<Vec<GameRecord>, AppError> {
        let games: Vec<GameRecord> = self
            .fetch_user_pgns(handle, limit)
            .await?
            .iter()
            .filter_map(|pgn| GameRecord::from_pgn(pgn, handle))
            .collect();

        tracing::info!(handle, count = games.len(), "Fetched Lichess games");
        Ok(games)
    }

    async fn count_games(&self, handle: &str) -> Result<u64, AppError> {
        let user = self
            .fetch_user(handle)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player not found: {handle}")))?;
        Ok(user["count"]["all"].as_u64().unwrap_or(0))
    }
}

/// Normalize the `/api/user/{name}` payload.
pub fn profile_from_user(handle: &str, user: &Value) -> PlatformProfile {
    let profile = user.get("profile");
    let profile_str = |key: &str| {
        profile
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let profile_int = |key: &str| {
        profile
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_i64())
            .map(|n| n as i32)
    };

    PlatformProfile {
        handle: user
            .get("username")
            .and_then(|v| v.as_str())
            .unwrap_or(handle)
            .to_string(),
        country: profile_str("country").or_else(|| profile_str("flag")),
        max_rating: PERF_KEYS
            .iter()
            .filter_map(|key| user.get("perfs")?.get(key)?.get("rating")?.as_i64())
            .max()
            .map(|r| r as i32),
        last_active_at: user
            .get("seenAt")
            .and_then(|v| v.as_i64())
            .and_then(DateTime::from_timestamp_millis),
        title: user.get("title").and_then(|v| v.as_str()).map(str::to_string),
        bio_text: profile_str("bio"),
        fide_rating_linked: profile_int("fideRating"),
        profile_text: None,
        birth_year: profile_int("birthYear"),
    }
}

/// `object=false` returns a bare array of names.
pub fn autocomplete_handles(data: &Value) -> Vec<String> {
    data.as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub fn pgns_from_ndjson(text: &str) -> Vec<String> {
    let mut results = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(game_data) => {
                if let Some(pgn) = game_data.get("pgn").and_then(|v| v.as_str()) {
                    if !pgn.is_empty() {
                        results.push(pgn.to_string());
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to parse Lichess game JSON: {e}");
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_from_user() {
        let user = json!({
            "id": "janedoe",
            "username": "JaneDoe",
            "title": "WFM",
            "seenAt": 1_700_000_000_000i64,
            "profile": {
                "country": "NO",
                "bio": "Born 2001",
                "fideRating": 2210,
                "birthYear": 2001,
            },
            "perfs": {
                "classical": { "rating": 2050 },
                "blitz": { "rating": 2180 },
                "puzzle": { "rating": 2600 },
            },
        });

        let profile = profile_from_user("janedoe", &user);
        assert_eq!(profile.handle, "JaneDoe");
        assert_eq!(profile.country.as_deref(), Some("NO"));
        assert_eq!(profile.max_rating, Some(2180));
        assert_eq!(profile.title.as_deref(), Some("WFM"));
        assert_eq!(profile.bio_text.as_deref(), Some("Born 2001"));
        assert_eq!(profile.fide_rating_linked, Some(2210));
        assert_eq!(profile.birth_year, Some(2001));
        assert_eq!(
            profile.last_active_at.map(|t| t.format("%Y-%m-%d").to_string()).as_deref(),
            Some("2023-11-14")
        );
    }

    #[test]
    fn test_profile_flag_fallback_and_missing() {
        let profile = profile_from_user("x", &json!({ "profile": { "flag": "GB-SCT" } }));
        assert_eq!(profile.country.as_deref(), Some("GB-SCT"));
        assert_eq!(profile.max_rating, None);

        let bare = profile_from_user("x", &json!({}));
        assert_eq!(bare, PlatformProfile::bare("x"));
    }

    #[test]
    fn test_autocomplete_handles() {
        assert_eq!(
            autocomplete_handles(&json!(["JohnSmith", "johnsmith99"])),
            vec!["JohnSmith", "johnsmith99"]
        );
        assert!(autocomplete_handles(&json!({ "result": [] })).is_empty());
    }

    #[test]
    fn test_pgns_from_ndjson_skips_bad_lines() {
        let text = "{\"id\":\"a\",\"pgn\":\"1. e4 e5\"}\n\nnot json\n{\"id\":\"b\",\"pgn\":\"\"}\n{\"id\":\"c\",\"pgn\":\"1. d4\"}\n";
        assert_eq!(pgns_from_ndjson(text), vec!["1. e4 e5", "1. d4"]);
    }
}
