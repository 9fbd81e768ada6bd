//! Chess primitives shared by the scout service: PGN parsing, game records,
//! the opening tree fold and the explorer cursor that walks it.

pub mod error;
pub mod explorer;
pub mod game_data;
pub mod opening_tree;
pub mod pgn;

pub use error::CoreError;
pub use game_data::{GameRecord, PlayerColor};
pub use opening_tree::{fold, MoveTreeNode};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
