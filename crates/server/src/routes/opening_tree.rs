use axum::{Extension, Json};
use chess_core::explorer::OpeningExplorer;
use chess_core::game_data::parse_games;
use chess_core::opening_tree::fold_to_depth;
use chess_core::GameRecord;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::clients::{parse_platform, Clients};
use crate::error::AppError;
use crate::routes::player_games::{clamp_limit, require_username};

/// Plies of each game folded into the tree.
pub const MAX_PLIES: usize = 30;

#[derive(Debug, Deserialize)]
pub struct PlayerRef {
    pub username: String,
    pub platform: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningTreeRequest {
    #[serde(default)]
    pub players: Vec<PlayerRef>,
    /// Pre-fetched games; when present no platform is contacted.
    pub games: Option<JsonValue>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub path: Vec<String>,
}

/// POST /api/opening-tree
/// Folds the players' recent games into one tree and reports statistics for
/// the position at the end of `path`.
pub async fn build_opening_tree(
    Extension(clients): Extension<Clients>,
    Json(req): Json<OpeningTreeRequest>,
) -> Result<Json<JsonValue>, AppError> {
    let games = match &req.games {
        Some(value) => parse_games(value)?,
        None => fetch_player_games(&clients, &req.players, clamp_limit(req.limit)).await?,
    };

    tracing::info!(games = games.len(), path_len = req.path.len(), "Building opening tree");
    Ok(Json(tree_response(&games, &req.path)?))
}

/// Games of every player in request order. A player whose fetch fails is
/// skipped.
async fn fetch_player_games(
    clients: &Clients,
    players: &[PlayerRef],
    limit: usize,
) -> Result<Vec<GameRecord>, AppError> {
    if players.is_empty() {
        return Err(AppError::BadRequest("At least one player is required".into()));
    }

    let mut targets = Vec::with_capacity(players.len());
    for player in players {
        targets.push((parse_platform(&player.platform)?, require_username(&player.username)?));
    }

    let fetches = targets.iter().map(|&(platform, username)| async move {
        match clients.game_source(platform).fetch_games(username, limit).await {
            Ok(games) => games,
            Err(e) => {
                tracing::warn!(%platform, username, error = %e, "Skipping player");
                Vec::new()
            }
        }
    });

    Ok(join_all(fetches).await.into_iter().flatten().collect())
}

pub fn tree_response<S: AsRef<str>>(games: &[GameRecord], path: &[S]) -> Result<JsonValue, AppError> {
    let mut explorer = OpeningExplorer::new(fold_to_depth(games, MAX_PLIES));
    for mv in path {
        explorer.play(mv.as_ref())?;
    }

    let stats = explorer.position_stats();
    let tree = explorer.tree();
    let played = explorer.path();

    Ok(json!({
        "totalGames": tree.play_count,
        "tree": tree.to_json(),
        "position": {
            "path": played,
            "fen": stats.fen,
            "turn": stats.turn,
            "frequency": tree.frequency_of(&played),
            "reachFrequency": stats.frequency,
            "topContinuation": stats.top_continuation,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::PlayerColor;

    fn game(moves: &str) -> GameRecord {
        GameRecord::new(
            moves.split_whitespace().map(str::to_string).collect(),
            "1-0",
            PlayerColor::White,
        )
    }

    #[test]
    fn test_tree_response_position_stats() {
        let games = vec![game("e4 e5 Nf3"), game("e4 c5"), game("d4 d5")];
        let resp = tree_response(&games, &["e4"]).unwrap();

        assert_eq!(resp["totalGames"], 3);
        assert_eq!(resp["tree"]["children"][0]["move"], "e4");
        assert_eq!(resp["tree"]["children"][0]["playCount"], 2);
        assert_eq!(resp["position"]["path"], json!(["e4"]));
        assert_eq!(resp["position"]["turn"], "Black");
        assert_eq!(resp["position"]["frequency"], 67);
        assert_eq!(resp["position"]["reachFrequency"], 67);
        assert_eq!(resp["position"]["topContinuation"]["move"], "e5");
        assert_eq!(resp["position"]["topContinuation"]["percentage"], 50);
    }

    #[test]
    fn test_tree_response_off_tree_path() {
        let games = vec![game("e4 e5")];
        let resp = tree_response(&games, &["d4"]).unwrap();
        assert_eq!(resp["position"]["frequency"], 0);
        assert_eq!(resp["position"]["reachFrequency"], 0);
        assert!(resp["position"]["topContinuation"].is_null());
    }

    #[test]
    fn test_tree_response_illegal_path() {
        let games = vec![game("e4 e5")];
        assert!(matches!(
            tree_response(&games, &["e4", "e4"]),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_empty_tree() {
        let resp = tree_response::<&str>(&[], &[]).unwrap();
        assert_eq!(resp["totalGames"], 0);
        assert_eq!(resp["position"]["reachFrequency"], 0);
        assert_eq!(resp["position"]["frequency"], 0);
        assert!(resp["position"]["topContinuation"].is_null());
    }
}
