pub mod chess_com;
pub mod lichess;

pub use chess_com::ChessComScorer;
pub use lichess::LichessScorer;

use crate::profile::Platform;
use crate::scorer_trait::ConfidenceScorer;

pub fn scorer_for(platform: Platform) -> Box<dyn ConfidenceScorer> {
    match platform {
        Platform::ChessCom => Box::new(ChessComScorer),
        Platform::Lichess => Box::new(LichessScorer),
    }
}
