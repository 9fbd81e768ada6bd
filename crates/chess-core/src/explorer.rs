//! Board cursor over a folded opening tree.
//!
//! The explorer keeps the moves the user has played and a board for the
//! current position. The tree node under the cursor is looked up from the
//! history on demand, so moves that leave the tree are still playable.

use serde::Serialize;
use shakmaty::{Chess, Color, Position};

use crate::error::CoreError;
use crate::opening_tree::{fen_of, play_san, MoveTreeNode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedMove {
    pub notation: String,
    pub fen: String,
    /// Share of the parent position's games that chose this move.
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopContinuation {
    #[serde(rename = "move")]
    pub mv: String,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStats {
    pub turn: &'static str,
    /// Share of all folded games that reached this position.
    pub frequency: u32,
    pub top_continuation: Option<TopContinuation>,
    pub fen: String,
}

pub struct OpeningExplorer {
    tree: MoveTreeNode,
    board: Chess,
    history: Vec<PlayedMove>,
    /// Number of history entries applied to `board`.
    cursor: usize,
}

impl OpeningExplorer {
    pub fn new(tree: MoveTreeNode) -> Self {
        Self {
            tree,
            board: Chess::default(),
            history: Vec::new(),
            cursor: 0,
        }
    }

    pub fn tree(&self) -> &MoveTreeNode {
        &self.tree
    }

    pub fn history(&self) -> &[PlayedMove] {
        &self.history
    }

    /// Moves leading to the current position.
    pub fn path(&self) -> Vec<&str> {
        self.history[..self.cursor]
            .iter()
            .map(|m| m.notation.as_str())
            .collect()
    }

    /// Play a move from the current position. Any moves after the cursor
    /// are discarded first.
    pub fn play(&mut self, notation: &str) -> Result<&PlayedMove, CoreError> {
        let mut next = self.board.clone();
        let san = play_san(&mut next, notation)
            .ok_or_else(|| CoreError::IllegalMove(notation.to_string()))?;

        let mut path = self.path();
        path.push(san.as_str());
        let frequency = self.tree.frequency_of(&path);

        let played = PlayedMove {
            fen: fen_of(&next),
            notation: san,
            frequency,
        };

        self.history.truncate(self.cursor);
        self.history.push(played);
        self.board = next;
        self.cursor = self.history.len();

        Ok(&self.history[self.cursor - 1])
    }

    /// Step back one move. Returns false at the start position.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.replay_to(self.cursor - 1);
        true
    }

    /// Step forward along the recorded history.
    pub fn forward(&mut self) -> bool {
        if self.cursor >= self.history.len() {
            return false;
        }
        self.replay_to(self.cursor + 1);
        true
    }

    /// Jump to the position after history entry `index`.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.history.len() {
            return false;
        }
        self.replay_to(index + 1);
        true
    }

    pub fn reset(&mut self) {
        self.board = Chess::default();
        self.history.clear();
        self.cursor = 0;
    }

    pub fn position_stats(&self) -> PositionStats {
        let path = self.path();

        PositionStats {
            turn: match self.board.turn() {
                Color::White => "White",
                Color::Black => "Black",
            },
            frequency: self.tree.reach_frequency(&path),
            top_continuation: self
                .tree
                .top_continuation(&path)
                .map(|(mv, percentage)| TopContinuation { mv, percentage }),
            fen: fen_of(&self.board),
        }
    }

    fn replay_to(&mut self, len: usize) {
        let mut board = Chess::default();
        for played in &self.history[..len] {
            // History only holds moves that were legal when recorded
            if play_san(&mut board, &played.notation).is_none() {
                break;
            }
        }
        self.board = board;
        self.cursor = len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::{GameRecord, PlayerColor};
    use crate::opening_tree::fold;

    fn explorer() -> OpeningExplorer {
        let games: Vec<GameRecord> = [
            vec!["e4", "e5", "Nf3"],
            vec!["e4", "c5"],
            vec!["e4", "c5"],
            vec!["d4", "d5"],
        ]
        .into_iter()
        .map(|moves| {
            GameRecord::new(
                moves.into_iter().map(String::from).collect(),
                "1/2-1/2",
                PlayerColor::Black,
            )
        })
        .collect();
        OpeningExplorer::new(fold(&games))
    }

    #[test]
    fn test_play_records_frequency() {
        let mut ex = explorer();
        assert_eq!(ex.play("e4").unwrap().frequency, 75);
        assert_eq!(ex.play("c5").unwrap().frequency, 67);
        assert_eq!(ex.path(), vec!["e4", "c5"]);
    }

    #[test]
    fn test_off_tree_move_has_zero_frequency() {
        let mut ex = explorer();
        assert_eq!(ex.play("a3").unwrap().frequency, 0);
        assert_eq!(ex.position_stats().frequency, 0);
        assert!(ex.position_stats().top_continuation.is_none());
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let mut ex = explorer();
        assert!(matches!(ex.play("e5"), Err(CoreError::IllegalMove(_))));
        assert!(ex.history().is_empty());
    }

    #[test]
    fn test_position_stats() {
        let mut ex = explorer();
        let start = ex.position_stats();
        assert_eq!(start.turn, "White");
        assert_eq!(start.frequency, 100);
        assert_eq!(
            start.top_continuation,
            Some(TopContinuation { mv: "e4".into(), percentage: 75 })
        );

        ex.play("e4").unwrap();
        let stats = ex.position_stats();
        assert_eq!(stats.turn, "Black");
        assert_eq!(stats.frequency, 75);
        assert_eq!(stats.top_continuation.unwrap().mv, "c5");
    }

    #[test]
    fn test_navigation() {
        let mut ex = explorer();
        ex.play("e4").unwrap();
        ex.play("e5").unwrap();
        assert!(ex.back());
        assert_eq!(ex.path(), vec!["e4"]);
        assert!(ex.forward());
        assert_eq!(ex.path(), vec!["e4", "e5"]);
        assert!(ex.go_to(0));
        assert_eq!(ex.position_stats().turn, "Black");

        // Playing from an earlier position drops the old continuation
        ex.play("c5").unwrap();
        assert_eq!(ex.history().len(), 2);
        assert!(!ex.forward());

        ex.reset();
        assert!(!ex.back());
        assert_eq!(ex.position_stats().turn, "White");
    }
}
