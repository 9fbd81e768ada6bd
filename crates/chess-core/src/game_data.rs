use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::CoreError;
use crate::pgn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Some(PlayerColor::White),
            "black" | "b" => Some(PlayerColor::Black),
            _ => None,
        }
    }
}

/// One game as consumed by the opening tree fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(default)]
    pub moves: Vec<String>, // SAN
    #[serde(default = "unknown_result")]
    pub result: String,
    #[serde(default = "default_color")]
    pub player_color: PlayerColor,
}

fn unknown_result() -> String {
    "Unknown".to_string()
}

fn default_color() -> PlayerColor {
    PlayerColor::White
}

impl GameRecord {
    pub fn new(moves: Vec<String>, result: &str, player_color: PlayerColor) -> Self {
        Self {
            moves,
            result: result.to_string(),
            player_color,
        }
    }

    /// Build a record from a PGN, seen from `player`'s side of the board.
    /// Returns None when the PGN has no moves or starts from a custom position.
    pub fn from_pgn(pgn_text: &str, player: &str) -> Option<Self> {
        let parsed = pgn::parse_pgn(pgn_text)?;
        if parsed.moves.is_empty() {
            return None;
        }

        let player_color = if parsed.metadata.black.eq_ignore_ascii_case(player) {
            PlayerColor::Black
        } else {
            PlayerColor::White
        };

        Some(Self {
            moves: parsed.moves,
            result: parsed.metadata.result,
            player_color,
        })
    }
}

/// Validate and convert a JSON array of games coming over the wire.
///
/// A missing or null `moves` field is an empty game (skipped by the fold);
/// anything else that is not an array of strings is rejected.
pub fn parse_games(value: &JsonValue) -> Result<Vec<GameRecord>, CoreError> {
    let items = value
        .as_array()
        .ok_or_else(|| CoreError::InvalidGame("expected an array of games".into()))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_game(idx, item))
        .collect()
}

fn parse_game(idx: usize, item: &JsonValue) -> Result<GameRecord, CoreError> {
    let obj = item
        .as_object()
        .ok_or_else(|| CoreError::InvalidGame(format!("game {idx} is not an object")))?;

    let moves = match obj.get("moves") {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(JsonValue::Array(arr)) => arr
            .iter()
            .map(|m| {
                m.as_str().map(str::to_string).ok_or_else(|| {
                    CoreError::InvalidGame(format!("game {idx} has a non-string move"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(CoreError::InvalidGame(format!(
                "game {idx}: moves must be an array"
            )))
        }
    };

    let result = obj
        .get("result")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(unknown_result);

    let player_color = match obj.get("playerColor").and_then(|v| v.as_str()) {
        None => PlayerColor::White,
        Some(s) => PlayerColor::parse(s).ok_or_else(|| {
            CoreError::InvalidGame(format!("game {idx}: unknown player colour '{s}'"))
        })?,
    };

    Ok(GameRecord {
        moves,
        result,
        player_color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_games_defaults() {
        let games = parse_games(&json!([
            {"moves": ["e4", "e5"], "result": "1-0", "playerColor": "black"},
            {"moves": null},
            {}
        ]))
        .unwrap();

        assert_eq!(games.len(), 3);
        assert_eq!(games[0].player_color, PlayerColor::Black);
        assert_eq!(games[0].moves, vec!["e4", "e5"]);
        assert!(games[1].moves.is_empty());
        assert_eq!(games[2].result, "Unknown");
        assert_eq!(games[2].player_color, PlayerColor::White);
    }

    #[test]
    fn test_parse_games_rejects_string_moves() {
        let err = parse_games(&json!([{"moves": "e4 e5"}])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidGame(_)));
    }

    #[test]
    fn test_parse_games_rejects_non_array() {
        assert!(parse_games(&json!({"moves": []})).is_err());
    }

    #[test]
    fn test_from_pgn_player_colour() {
        let pgn = r#"[White "Alice"]
[Black "Bob"]
[Result "0-1"]

1. e4 e5 2. Nf3 Nc6 0-1"#;

        let as_bob = GameRecord::from_pgn(pgn, "bob").unwrap();
        assert_eq!(as_bob.player_color, PlayerColor::Black);
        assert_eq!(as_bob.result, "0-1");
        assert_eq!(as_bob.moves.len(), 4);

        let as_alice = GameRecord::from_pgn(pgn, "Alice").unwrap();
        assert_eq!(as_alice.player_color, PlayerColor::White);
    }
}
