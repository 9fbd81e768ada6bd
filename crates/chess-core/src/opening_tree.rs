//! Opening tree builder for repertoire exploration.
//!
//! Games are folded into a trie keyed by canonical SAN. Each node counts how
//! many folded games reached it and remembers the FEN of the first game that
//! got there.

use serde_json::Value as JsonValue;
use shakmaty::{fen::Fen, san::San, san::SanPlus, Chess, EnPassantMode, Position};

use crate::game_data::GameRecord;
use crate::STARTING_FEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTreeNode {
    /// None only at the root.
    pub move_notation: Option<String>,
    pub play_count: u32,
    pub position_key: String,
    /// Unique by move notation, in first-seen order.
    pub children: Vec<MoveTreeNode>,
}

impl MoveTreeNode {
    fn root() -> Self {
        Self {
            move_notation: None,
            play_count: 0,
            position_key: STARTING_FEN.to_string(),
            children: Vec::new(),
        }
    }

    fn new(mv: &str, fen: &str) -> Self {
        Self {
            move_notation: Some(mv.to_string()),
            play_count: 0,
            position_key: fen.to_string(),
            children: Vec::new(),
        }
    }

    pub fn child(&self, notation: &str) -> Option<&MoveTreeNode> {
        self.children
            .iter()
            .find(|c| c.move_notation.as_deref() == Some(notation))
    }

    /// Walk `path` from the starting position. Moves may be written in any
    /// SAN the board accepts ("Qh5" finds "Qh5+").
    pub fn node_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&MoveTreeNode> {
        let canonical = canonical_path(path)?;
        self.walk(&canonical)
    }

    fn walk(&self, path: &[String]) -> Option<&MoveTreeNode> {
        path.iter().try_fold(self, |node, mv| node.child(mv))
    }

    /// Share of the parent's games that continued with the last move of
    /// `path`, as a rounded percentage. 0 when the path is empty, illegal
    /// or absent.
    pub fn frequency_of<S: AsRef<str>>(&self, path: &[S]) -> u32 {
        let Some(canonical) = canonical_path(path) else {
            return 0;
        };
        let Some((last, parent_path)) = canonical.split_last() else {
            return 0;
        };
        let Some(parent) = self.walk(parent_path) else {
            return 0;
        };
        match parent.child(last) {
            Some(node) => percentage(node.play_count, parent.play_count),
            None => 0,
        }
    }

    /// Share of all folded games that reached the end of `path`.
    pub fn reach_frequency<S: AsRef<str>>(&self, path: &[S]) -> u32 {
        self.node_at(path)
            .map(|node| percentage(node.play_count, self.play_count))
            .unwrap_or(0)
    }

    /// Most played reply at the end of `path` with its share of that node's games.
    pub fn top_continuation<S: AsRef<str>>(&self, path: &[S]) -> Option<(String, u32)> {
        let node = self.node_at(path)?;
        let best = node.most_played()?;
        let mv = best.move_notation.clone()?;
        Some((mv, percentage(best.play_count, node.play_count)))
    }

    /// Highest play count wins; ties go to the move seen first.
    pub fn most_played(&self) -> Option<&MoveTreeNode> {
        self.children.iter().fold(None, |best, c| match best {
            Some(b) if b.play_count >= c.play_count => Some(b),
            _ => Some(c),
        })
    }

    /// Response shape: children as an array sorted by play count.
    pub fn to_json(&self) -> JsonValue {
        let mut children: Vec<&MoveTreeNode> = self.children.iter().collect();
        children.sort_by(|a, b| b.play_count.cmp(&a.play_count));

        serde_json::json!({
            "move": self.move_notation,
            "fen": self.position_key,
            "playCount": self.play_count,
            "children": children.into_iter().map(|c| c.to_json()).collect::<Vec<_>>(),
        })
    }
}

/// Fold every game into a fresh tree.
pub fn fold(games: &[GameRecord]) -> MoveTreeNode {
    fold_to_depth(games, usize::MAX)
}

/// Fold games, looking at no more than `max_plies` half-moves of each.
pub fn fold_to_depth(games: &[GameRecord], max_plies: usize) -> MoveTreeNode {
    let mut root = MoveTreeNode::root();

    for game in games {
        if game.moves.is_empty() {
            continue;
        }
        root.play_count += 1;

        let moves = &game.moves[..game.moves.len().min(max_plies)];
        fold_game(&mut root, moves);
    }

    root
}

fn fold_game(root: &mut MoveTreeNode, moves: &[String]) {
    let mut current = root;
    let mut pos = Chess::default();

    for move_san in moves {
        // An unreadable or illegal move ends this game's contribution
        let Some(san) = play_san(&mut pos, move_san) else {
            break;
        };

        let idx = match current
            .children
            .iter()
            .position(|c| c.move_notation.as_deref() == Some(san.as_str()))
        {
            Some(idx) => idx,
            None => {
                current.children.push(MoveTreeNode::new(&san, &fen_of(&pos)));
                current.children.len() - 1
            }
        };

        current = &mut current.children[idx];
        current.play_count += 1;
    }
}

/// Play a SAN move on `pos` and return its canonical notation with the
/// check or mate suffix. `pos` is untouched when the move is not legal.
pub fn play_san(pos: &mut Chess, notation: &str) -> Option<String> {
    let san_plus: SanPlus = notation.trim().parse().ok()?;
    let mv = san_plus.san.to_move(&*pos).ok()?;

    let san = San::from_move(&*pos, mv.clone());
    pos.play_unchecked(mv);

    let suffix = if pos.is_checkmate() {
        "#"
    } else if pos.is_check() {
        "+"
    } else {
        ""
    };
    Some(format!("{san}{suffix}"))
}

/// Replay `path` from the starting position and return the canonical
/// notation of each move. None when any move is unreadable or illegal.
pub fn canonical_path<S: AsRef<str>>(path: &[S]) -> Option<Vec<String>> {
    let mut pos = Chess::default();
    path.iter()
        .map(|mv| play_san(&mut pos, mv.as_ref()))
        .collect()
}

pub fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Rounded `count / total` percentage; 0 when `total` is 0.
pub fn percentage(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::PlayerColor;

    fn game(moves: &[&str]) -> GameRecord {
        GameRecord::new(
            moves.iter().map(|m| m.to_string()).collect(),
            "1-0",
            PlayerColor::White,
        )
    }

    #[test]
    fn test_fold_empty() {
        let root = fold(&[]);
        assert_eq!(root.play_count, 0);
        assert!(root.children.is_empty());
        assert!(root.move_notation.is_none());
        assert_eq!(root.position_key, STARTING_FEN);
    }

    #[test]
    fn test_fold_shared_prefix() {
        let root = fold(&[
            game(&["e4", "e5", "Nf3", "Nc6"]),
            game(&["e4", "e5", "Bc4", "Nf6"]),
        ]);

        assert_eq!(root.play_count, 2);
        let e4 = root.child("e4").unwrap();
        assert_eq!(e4.play_count, 2);
        let e5 = e4.child("e5").unwrap();
        assert_eq!(e5.play_count, 2);
        assert_eq!(e5.children.len(), 2);
        assert_eq!(e5.child("Nf3").unwrap().play_count, 1);
        assert_eq!(e5.child("Bc4").unwrap().play_count, 1);
    }

    #[test]
    fn test_fold_skips_empty_games() {
        let root = fold(&[game(&[]), game(&["d4"]), game(&[])]);
        assert_eq!(root.play_count, 1);
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_illegal_move_truncates_game() {
        let root = fold(&[game(&["e4", "e4", "Nf3"]), game(&["e4", "c5"])]);
        let e4 = root.child("e4").unwrap();
        assert_eq!(e4.play_count, 2);
        assert_eq!(e4.children.len(), 1);
        assert!(e4.child("c5").is_some());
        assert!(root.node_at(&["e4", "e4"]).is_none());
    }

    #[test]
    fn test_canonical_notation_adds_check_suffix() {
        let root = fold(&[game(&["e4", "f5", "Qh5"])]);
        assert!(root.node_at(&["e4", "f5", "Qh5+"]).is_some());
    }

    #[test]
    fn test_records_fen_after_move() {
        let root = fold(&[game(&["e4"])]);
        let e4 = root.child("e4").unwrap();
        assert!(e4
            .position_key
            .starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
    }

    #[test]
    fn test_frequency_of() {
        let root = fold(&[
            game(&["e4", "e5"]),
            game(&["e4", "c5"]),
            game(&["e4", "c5"]),
            game(&["d4", "d5"]),
        ]);

        assert_eq!(root.frequency_of(&["e4"]), 75);
        assert_eq!(root.frequency_of(&["d4"]), 25);
        assert_eq!(root.frequency_of(&["e4", "c5"]), 67);
        assert_eq!(root.frequency_of(&["c4"]), 0);
        assert_eq!(root.frequency_of::<&str>(&[]), 0);
        assert_eq!(root.reach_frequency(&["e4", "c5"]), 50);
    }

    #[test]
    fn test_top_continuation() {
        let root = fold(&[
            game(&["e4", "e5"]),
            game(&["e4", "c5"]),
            game(&["e4", "c5"]),
        ]);

        assert_eq!(root.top_continuation::<&str>(&[]), Some(("e4".to_string(), 100)));
        assert_eq!(root.top_continuation(&["e4"]), Some(("c5".to_string(), 67)));
        assert_eq!(root.top_continuation(&["e4", "c5"]), None);
        assert_eq!(root.top_continuation(&["d4"]), None);
    }

    #[test]
    fn test_top_continuation_tie_keeps_first_seen() {
        let root = fold(&[game(&["d4"]), game(&["e4"])]);
        assert_eq!(root.top_continuation::<&str>(&[]), Some(("d4".to_string(), 50)));
    }

    #[test]
    fn test_queries_accept_game_notation() {
        let root = fold(&[game(&["e4", "f5", "Qh5"]), game(&["d4", "Nf6", "Nd2"])]);

        assert_eq!(root.frequency_of(&["e4", "f5", "Qh5"]), 100);
        assert_eq!(root.frequency_of(&["e4", "f5", "Qh5+"]), 100);
        assert!(root.node_at(&["e4", "f5", "Qh5"]).is_some());
        assert_eq!(root.reach_frequency(&["d4", "Nf6", "Nbd2"]), 50);
        assert_eq!(root.top_continuation(&["e4", "f5"]), Some(("Qh5+".to_string(), 100)));
    }

    #[test]
    fn test_queries_with_illegal_path() {
        let root = fold(&[game(&["e4", "e5"])]);
        assert_eq!(root.frequency_of(&["e4", "e4"]), 0);
        assert!(root.node_at(&["Ke2"]).is_none());
        assert_eq!(root.top_continuation(&["zz"]), None);
    }

    #[test]
    fn test_fold_to_depth() {
        let root = fold_to_depth(&[game(&["e4", "e5", "Nf3"])], 2);
        assert!(root.node_at(&["e4", "e5"]).is_some());
        assert!(root.node_at(&["e4", "e5", "Nf3"]).is_none());
    }

    #[test]
    fn test_to_json_sorted_children() {
        let root = fold(&[game(&["d4"]), game(&["e4"]), game(&["e4"])]);
        let json = root.to_json();
        assert_eq!(json["playCount"], 3);
        assert_eq!(json["children"][0]["move"], "e4");
        assert_eq!(json["children"][0]["playCount"], 2);
        assert_eq!(json["children"][1]["move"], "d4");
    }
}
