use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// The two move types: covering marks squares on the actor's own board,
/// uncovering removes marks from the opponent's board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum MoveKind {
    Cover,
    Uncover,
}

/// A fully specified move: which side acts, in which direction, and the
/// exact squares toggled. `squares` is ascending and sums to `dice_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub actor: PlayerId,
    pub kind: MoveKind,
    pub dice_total: u8,
    pub squares: Vec<u8>,
}

impl Move {
    #[must_use]
    pub fn square_count(&self) -> usize {
        self.squares.len()
    }

    /// The largest square in the combination (0 for an empty one).
    #[must_use]
    pub fn highest_square(&self) -> u8 {
        self.squares.last().copied().unwrap_or(0)
    }
}

/// A handicap carried into a round: `square` is pre-covered on `player`'s
/// board when the round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advantage {
    pub player: PlayerId,
    pub square: u8,
}

/// The in-round protection created from an [`Advantage`].
///
/// While `unlocked` is false the square cannot be uncovered by the holder's
/// opponent; the flag flips once the opponent completes one full turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvantageLock {
    pub holder: PlayerId,
    pub square: u8,
    pub unlocked: bool,
}

impl AdvantageLock {
    #[must_use]
    pub fn new(advantage: Advantage) -> Self {
        Self {
            holder: advantage.player,
            square: advantage.square,
            unlocked: false,
        }
    }

    /// The square this lock currently withholds from uncover moves against
    /// `board_owner`'s board, if any.
    #[must_use]
    pub fn blocked_square_for(&self, board_owner: PlayerId) -> Option<u8> {
        (!self.unlocked && self.holder == board_owner).then_some(self.square)
    }
}
