use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A game record that does not have the expected shape.
    #[error("Invalid game record: {0}")]
    InvalidGame(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),
}
