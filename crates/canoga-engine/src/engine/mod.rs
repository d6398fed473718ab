//! Round and tournament state management.
//!
//! - [`Round`] - one game to a win condition: the per-turn state machine,
//!   legal-move listing, and round-end evaluation
//! - [`Tournament`] - the ongoing sequence of rounds: cumulative scores and
//!   the carried-over advantage (handicap)
//!
//! A driving loop owns both plus a [`Dice`](crate::Dice) value: it starts a
//! round through the tournament, runs roll → apply → switch against the
//! round, and hands the finished round back to the tournament, which scores
//! it and computes the next round's handicap.

pub use self::{round::*, tournament::*};

mod round;
mod tournament;
