use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use account_finder::sources::{AccountSource, DiscoveredAccount, FetchError};
use account_finder::{Platform, PlatformProfile, SecondaryLookups};
use async_trait::async_trait;
use chess_core::GameRecord;
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;

use super::{get_json, get_text, GameSource};
use crate::error::AppError;

const RATING_KEYS: [&str; 4] = ["chess_rapid", "chess_blitz", "chess_bullet", "chess_daily"];

pub struct ChessComClient {
    client: Client,
    base_url: String,
    /// `/pub/player` payloads seen by `discover`, taken by `fetch_profile`
    /// so each account is requested once. Keyed by lowercase handle.
    discovered: Mutex<HashMap<String, Value>>,
}

impl ChessComClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            discovered: Mutex::new(HashMap::new()),
        }
    }

    fn remember_player(&self, handle: &str, player: Value) {
        if let Ok(mut cache) = self.discovered.lock() {
            cache.insert(handle.to_lowercase(), player);
        }
    }

    fn take_player(&self, handle: &str) -> Option<Value> {
        self.discovered
            .lock()
            .ok()
            .and_then(|mut cache| cache.remove(&handle.to_lowercase()))
    }

    fn player_url(&self, username: &str) -> String {
        format!("{}/pub/player/{}", self.base_url, username.to_lowercase())
    }

    /// Monthly archive URLs, newest first.
    pub async fn fetch_archives(&self, username: &str) -> Result<Vec<String>, AppError> {
        let url = format!("{}/games/archives", self.player_url(username));

        tokio::time::sleep(Duration::from_millis(100)).await;

        let data = get_json(&self.client, &url)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player not found: {username}")))?;

        Ok(archive_urls(&data))
    }

    /// PGNs of the rated standard games in one monthly archive, oldest first.
    pub async fn fetch_archive_pgns(&self, archive_url: &str) -> Result<Vec<String>, AppError> {
        tokio::time::sleep(Duration::from_millis(100)).await;

        match get_json(&self.client, archive_url).await? {
            Some(data) => Ok(standard_pgns(&data)),
            None => Ok(vec![]),
        }
    }

    /// Number of games of any kind in one monthly archive.
    pub async fn fetch_archive_size(&self, archive_url: &str) -> Result<u64, AppError> {
        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(get_json(&self.client, archive_url)
            .await?
            .and_then(|data| data["games"].as_array().map(|g| g.len() as u64))
            .unwrap_or(0))
    }
}

#[async_trait]
impl AccountSource for ChessComClient {
    fn platform(&self) -> Platform {
        Platform::ChessCom
    }

    async fn discover(&self, pattern: &str) -> Result<Vec<DiscoveredAccount>, FetchError> {
        let Some(player) = get_json(&self.client, &self.player_url(pattern)).await? else {
            return Ok(vec![]);
        };
        let handle = player
            .get("username")
            .and_then(|v| v.as_str())
            .unwrap_or(pattern)
            .to_string();
        self.remember_player(&handle, player);
        Ok(vec![DiscoveredAccount::confirmed(&handle)])
    }

    async fn fetch_profile(
        &self,
        handle: &str,
        lookups: SecondaryLookups,
    ) -> Result<Option<PlatformProfile>, FetchError> {
        let player = match self.take_player(handle) {
            Some(player) => player,
            None => match get_json(&self.client, &self.player_url(handle)).await? {
                Some(player) => player,
                None => return Ok(None),
            },
        };
        let mut profile = profile_from_player(handle, &player);

        if lookups.stats {
            let url = format!("{}/stats", self.player_url(handle));
            match get_json(&self.client, &url).await {
                Ok(Some(stats)) => profile.max_rating = max_rating(&stats),
                Ok(None) => {}
                Err(e) => tracing::debug!(handle, error = %e, "Stats lookup failed"),
            }
        }

        if lookups.profile_page {
            if let Some(page_url) = player.get("url").and_then(|v| v.as_str()) {
                match get_text(&self.client, page_url).await {
                    Ok(text) => profile.profile_text = text,
                    Err(e) => tracing::debug!(handle, error = %e, "Profile page lookup failed"),
                }
            }
        }

        Ok(Some(profile))
    }
}

#[async_trait]
impl GameSource for ChessComClient {
    async fn fetch_games(&self, handle: &str, limit: usize) -> Result<Vec<GameRecord>, AppError> {
        let archives = self.fetch_archives(handle).await?;
        let games = newest_games(&archives, handle, limit, |url| async move {
            self.fetch_archive_pgns(&url).await
        })
        .await;

        tracing::info!(handle, count = games.len(), "Fetched chess.com games");
        Ok(games)
    }

    async fn count_games(&self, handle: &str) -> Result<u64, AppError> {
        let archives = self.fetch_archives(handle).await?;
        Ok(total_archive_games(&archives, |url| async move {
            self.fetch_archive_size(&url).await
        })
        .await)
    }
}

/// Walk archives newest first and keep up to `limit` games, newest first.
/// An archive that fails to load is logged and skipped.
pub async fn newest_games<F, Fut>(
    archives: &[String],
    handle: &str,
    limit: usize,
    mut fetch: F,
) -> Vec<GameRecord>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<String>, AppError>>,
{
    let mut games = Vec::new();

    for archive in archives {
        if games.len() >= limit {
            break;
        }
        let pgns = match fetch(archive.clone()).await {
            Ok(pgns) => pgns,
            Err(e) => {
                tracing::warn!(handle, archive = %archive, error = %e, "Skipping archive");
                continue;
            }
        };
        for pgn in pgns.iter().rev() {
            if games.len() >= limit {
                break;
            }
            if let Some(game) = GameRecord::from_pgn(pgn, handle) {
                games.push(game);
            }
        }
    }

    games
}

/// Sum archive sizes, skipping archives that fail to load.
pub async fn total_archive_games<F, Fut>(archives: &[String], mut fetch: F) -> u64
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<u64, AppError>>,
{
    let mut total = 0u64;
    for archive in archives {
        match fetch(archive.clone()).await {
            Ok(count) => total += count,
            Err(e) => tracing::warn!(archive = %archive, error = %e, "Skipping archive"),
        }
    }
    total
}

/// Normalize the `/pub/player/{name}` payload.
pub fn profile_from_player(handle: &str, player: &Value) -> PlatformProfile {
    let handle = player
        .get("username")
        .and_then(|v| v.as_str())
        .unwrap_or(handle);

    PlatformProfile {
        handle: handle.to_string(),
        // "https://api.chess.com/pub/country/US" -> "US"
        country: player
            .get("country")
            .and_then(|v| v.as_str())
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|code| !code.is_empty())
            .map(str::to_string),
        last_active_at: player
            .get("last_online")
            .and_then(|v| v.as_i64())
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        title: player
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        ..Default::default()
    }
}

/// Best current rating across rapid, blitz, bullet and daily.
pub fn max_rating(stats: &Value) -> Option<i32> {
    RATING_KEYS
        .iter()
        .filter_map(|key| stats.get(key)?.get("last")?.get("rating")?.as_i64())
        .max()
        .map(|r| r as i32)
}

pub fn archive_urls(data: &Value) -> Vec<String> {
    let mut urls: Vec<String> = data["archives"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    // Archive URLs end in /YYYY/MM, so lexical order is chronological
    urls.sort_by(|a, b| b.cmp(a));
    urls
}

pub fn standard_pgns(data: &Value) -> Vec<String> {
    data["games"]
        .as_array()
        .map(|games| {
            games
                .iter()
                .filter(|game| game.get("rated").and_then(|v| v.as_bool()).unwrap_or(true))
                .filter(|game| game.get("rules").and_then(|v| v.as_str()).unwrap_or("chess") == "chess")
                .filter_map(|game| game.get("pgn").and_then(|v| v.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
