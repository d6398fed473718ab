//! Save, load and rewind for Canoga matches.
//!
//! A [`Snapshot`] is a flat value describing a round-in-progress plus the
//! tournament scores around it; [`serialize`]/[`deserialize`] move it
//! through the textual save format, and [`History`] keeps an ordered log of
//! labeled snapshots for rewinding. Nothing here mutates engine state:
//! snapshots are captured from it and restored into fresh values.

pub use self::{codec::*, history::*, snapshot::*};

mod codec;
mod history;
mod snapshot;

/// Why a snapshot text could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SnapshotError {
    #[display("snapshot is missing its '{_0}' section")]
    MissingSection(#[error(not(source))] &'static str),
    #[display("board size {_0} is outside 9..=11")]
    BoardSize(#[error(not(source))] usize),
    #[display("the two board arrays differ in length")]
    MismatchedBoards,
    #[display("square {square} must hold 0 or {square}, got '{value}'")]
    CorruptSquare { square: usize, value: String },
    #[display("cannot parse '{value}' in the {context} line")]
    Malformed {
        context: &'static str,
        value: String,
    },
}
