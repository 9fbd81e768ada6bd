//! Lightweight regex-based PGN parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::game_data::GameMetadata;
use crate::STARTING_FEN;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("valid header regex"));
static HEADER_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid header block regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("valid comment regex"));
static VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid variation regex"));
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O")
        .expect("valid move regex")
});

/// Headers plus the SAN mainline of one PGN game.
#[derive(Debug, Clone)]
pub struct ParsedGame {
    pub metadata: GameMetadata,
    pub moves: Vec<String>,
}

/// Parse a PGN string. Games set up from a non-standard position are skipped.
pub fn parse_pgn(pgn: &str) -> Option<ParsedGame> {
    let mut white = "Unknown".to_string();
    let mut black = "Unknown".to_string();
    let mut result = "*".to_string();
    let mut setup = None;
    let mut fen = None;

    for cap in HEADER_RE.captures_iter(pgn) {
        let key = &cap[1];
        let value = cap[2].to_string();
        match key {
            "White" => white = value,
            "Black" => black = value,
            "Result" => result = value,
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    // Filter non-standard positions
    if setup.as_deref() == Some("1") {
        if let Some(ref f) = fen {
            if f != STARTING_FEN {
                return None;
            }
        }
    }

    Some(ParsedGame {
        metadata: GameMetadata {
            white,
            black,
            result,
        },
        moves: extract_moves(pgn),
    })
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_BLOCK_RE.replace_all(pgn, "");
    let no_comments = COMMENT_RE.replace_all(&no_headers, "");
    let no_variations = VARIATION_RE.replace_all(&no_comments, "");

    MOVE_RE
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pgn_basic() {
        let pgn = r#"[White "Player1"]
[Black "Player2"]
[Result "1-0"]
[Date "2025.01.15"]
[TimeControl "600"]

1. e4 e5 2. Nf3 Nc6 1-0"#;

        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.metadata.white, "Player1");
        assert_eq!(game.metadata.black, "Player2");
        assert_eq!(game.metadata.result, "1-0");
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_parse_pgn_strips_clock_comments() {
        let pgn = r#"[White "a"]
[Black "b"]
[Result "*"]

1. e4 {[%clk 0:02:59]} 1... c5 {[%clk 0:02:58]} 2. Nf3 (2. c3 d5) 2... d6 *"#;

        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.moves, vec!["e4", "c5", "Nf3", "d6"]);
    }

    #[test]
    fn test_parse_pgn_skips_custom_setup() {
        let pgn = r#"[SetUp "1"]
[FEN "8/8/8/8/8/8/8/K6k w - - 0 1"]

1. Kb1 Kg1 *"#;

        assert!(parse_pgn(pgn).is_none());
    }

    #[test]
    fn test_parse_pgn_keeps_players_and_result_only() {
        let pgn = r#"[Site "Chess.com"]
[White "opponent"]
[Black "JaneDoe"]
[Result "0-1"]
[Link "https://www.chess.com/game/live/e4d5"]

1. d4 d5 0-1"#;

        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.metadata.black, "JaneDoe");
        assert_eq!(game.metadata.result, "0-1");
        assert_eq!(game.moves, vec!["d4", "d5"]);
    }
}
