use axum::{extract::Query, Extension, Json};
use chess_core::GameRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::clients::{parse_platform, Clients};
use crate::error::AppError;

pub const DEFAULT_GAME_LIMIT: usize = 15;
pub const MAX_GAME_LIMIT: usize = 500;

#[derive(Deserialize)]
pub struct GameCountQuery {
    pub username: String,
    pub platform: String,
}

/// GET /api/player-games?username=...&platform=...
pub async fn get_game_count(
    Extension(clients): Extension<Clients>,
    Query(q): Query<GameCountQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let platform = parse_platform(&q.platform)?;
    let username = require_username(&q.username)?;

    let count = clients.game_source(platform).count_games(username).await?;
    Ok(Json(json!({ "count": count })))
}

#[derive(Deserialize)]
pub struct PlayerGamesQuery {
    pub site: String,
    pub player: String,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGamesResponse {
    pub games: Vec<GameRecord>,
    pub total_games: usize,
}

/// GET /api/openingtree/playerGames?site=...&player=...&limit=...
pub async fn get_player_games(
    Extension(clients): Extension<Clients>,
    Query(q): Query<PlayerGamesQuery>,
) -> Result<Json<PlayerGamesResponse>, AppError> {
    let platform = parse_platform(&q.site)?;
    let player = require_username(&q.player)?;
    let limit = clamp_limit(q.limit);

    let games = clients.game_source(platform).fetch_games(player, limit).await?;
    Ok(Json(PlayerGamesResponse {
        total_games: games.len(),
        games,
    }))
}

pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_GAME_LIMIT).clamp(1, MAX_GAME_LIMIT)
}

pub fn require_username(username: &str) -> Result<&str, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }
    Ok(username)
}
