pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board size must be between 9 and 11, got {_0}")]
    BoardSize(#[error(not(source))] u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("square {square} is out of range for a board of size {size}")]
pub struct OutOfRangeError {
    pub square: u8,
    pub size: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    OutOfRange(OutOfRangeError),
    #[display("square {_0} is already covered")]
    AlreadyCovered(#[error(not(source))] u8),
    #[display("square {_0} is already uncovered")]
    AlreadyUncovered(#[error(not(source))] u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("die value {_0} is not in 1..=6")]
pub struct InvalidDieValueError(#[error(not(source))] pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RollError {
    #[display("rolling is only allowed while awaiting a roll")]
    WrongPhase,
    #[display("one die may only be rolled once squares 7 and above are covered")]
    OneDieNotAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("a move may only be applied while one is awaited")]
    WrongPhase,
    #[display("the selected combination is not currently legal")]
    InvalidMove,
    OutOfRange(OutOfRangeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("operation is not valid in the current round phase")]
pub struct WrongPhaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RestoreError {
    Config(ConfigError),
    #[display("the two boards disagree on their size")]
    MismatchedBoardSizes,
    #[display("advantage square {_0} is out of range for the board")]
    LockSquareOutOfRange(#[error(not(source))] u8),
    #[display("awaiting-move phase requires pending dice")]
    MissingPendingRoll,
}
