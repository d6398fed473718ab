use std::fmt::Write as _;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{BoardError, ConfigError, OutOfRangeError};

use super::moves::MoveKind;

/// Smallest playable board.
pub const MIN_BOARD_SIZE: u8 = 9;
/// Largest playable board.
pub const MAX_BOARD_SIZE: u8 = 11;

/// One player's row of numbered squares.
///
/// Squares are numbered `1..=size`; each is either uncovered (worth its own
/// number) or covered (worth nothing). The covered set is stored as a bitmask
/// where bit `n` corresponds to square `n`.
///
/// A single-die roll is only permitted once every square from 7 upward is
/// covered; [`Board::can_use_one_die`] implements that gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    covered: u16,
}

impl Board {
    /// Creates a fully uncovered board.
    pub fn new(size: u8) -> Result<Self, ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(ConfigError::BoardSize(size));
        }
        Ok(Self { size, covered: 0 })
    }

    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    fn check_range(&self, square: u8) -> Result<(), OutOfRangeError> {
        if (1..=self.size).contains(&square) {
            Ok(())
        } else {
            Err(OutOfRangeError {
                square,
                size: self.size,
            })
        }
    }

    fn mask(square: u8) -> u16 {
        1 << square
    }

    pub fn is_covered(&self, square: u8) -> Result<bool, OutOfRangeError> {
        self.check_range(square)?;
        Ok(self.covered & Self::mask(square) != 0)
    }

    /// Covers an uncovered square.
    pub fn cover(&mut self, square: u8) -> Result<(), BoardError> {
        if self.is_covered(square).map_err(BoardError::OutOfRange)? {
            return Err(BoardError::AlreadyCovered(square));
        }
        self.covered |= Self::mask(square);
        Ok(())
    }

    /// Uncovers a covered square.
    pub fn uncover(&mut self, square: u8) -> Result<(), BoardError> {
        if !self.is_covered(square).map_err(BoardError::OutOfRange)? {
            return Err(BoardError::AlreadyUncovered(square));
        }
        self.covered &= !Self::mask(square);
        Ok(())
    }

    /// Idempotent variant of [`cover`](Self::cover) / [`uncover`](Self::uncover),
    /// used when rebuilding a board from a snapshot.
    pub fn set_covered(&mut self, square: u8, covered: bool) -> Result<(), OutOfRangeError> {
        self.check_range(square)?;
        if covered {
            self.covered |= Self::mask(square);
        } else {
            self.covered &= !Self::mask(square);
        }
        Ok(())
    }

    pub fn squares(&self) -> impl Iterator<Item = u8> + '_ {
        1..=self.size
    }

    pub fn covered_squares(&self) -> impl Iterator<Item = u8> + '_ {
        self.squares().filter(|&s| self.covered & Self::mask(s) != 0)
    }

    pub fn uncovered_squares(&self) -> impl Iterator<Item = u8> + '_ {
        self.squares().filter(|&s| self.covered & Self::mask(s) == 0)
    }

    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.covered.count_ones() as usize
    }

    #[must_use]
    pub fn uncovered_count(&self) -> usize {
        usize::from(self.size) - self.covered_count()
    }

    #[must_use]
    pub fn all_covered(&self) -> bool {
        self.covered_count() == usize::from(self.size)
    }

    #[must_use]
    pub fn all_uncovered(&self) -> bool {
        self.covered == 0
    }

    #[must_use]
    pub fn sum_covered(&self) -> u32 {
        self.covered_squares().map(u32::from).sum()
    }

    #[must_use]
    pub fn sum_uncovered(&self) -> u32 {
        self.uncovered_squares().map(u32::from).sum()
    }

    /// The wire value of each square in order: 0 when covered, otherwise
    /// the square's own number.
    pub fn square_values(&self) -> impl Iterator<Item = u8> + '_ {
        self.squares().map(|s| {
            if self.covered & Self::mask(s) != 0 {
                0
            } else {
                s
            }
        })
    }

    /// Whether a single-die roll is permitted for this board's owner:
    /// every square from 7 through `size` must be covered.
    #[must_use]
    pub fn can_use_one_die(&self) -> bool {
        (7..=self.size).all(|s| self.covered & Self::mask(s) != 0)
    }

    /// Finds every combination of distinct candidate squares summing to `target`.
    ///
    /// Candidates are the currently uncovered squares for [`MoveKind::Cover`]
    /// and the currently covered squares for [`MoveKind::Uncover`]; `blocked`
    /// removes a square from the uncover candidates while an advantage lock
    /// protects it. Combinations are produced in ascending order, each exactly
    /// once, with no cap on member count.
    #[must_use]
    pub fn find_combinations(
        &self,
        target: u8,
        mode: MoveKind,
        blocked: Option<u8>,
    ) -> Vec<Vec<u8>> {
        let candidates: Vec<u8> = self
            .squares()
            .filter(|&s| {
                let covered = self.covered & Self::mask(s) != 0;
                match mode {
                    MoveKind::Cover => !covered,
                    MoveKind::Uncover => covered && Some(s) != blocked,
                }
            })
            .collect();

        let mut found = Vec::new();
        let mut current = Vec::new();
        Self::backtrack(&candidates, 0, u16::from(target), &mut current, &mut found);
        found
    }

    fn backtrack(
        candidates: &[u8],
        start: usize,
        remaining: u16,
        current: &mut Vec<u8>,
        found: &mut Vec<Vec<u8>>,
    ) {
        if remaining == 0 {
            if !current.is_empty() {
                found.push(current.clone());
            }
            return;
        }
        for (offset, &square) in candidates[start..].iter().enumerate() {
            // Candidates are ascending, so once one overshoots they all do.
            if u16::from(square) > remaining {
                break;
            }
            current.push(square);
            Self::backtrack(
                candidates,
                start + offset + 1,
                remaining - u16::from(square),
                current,
                found,
            );
            current.pop();
        }
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: "1 0 3 ..." (0 = covered, otherwise the square's own number)
        let mut text = String::with_capacity(usize::from(self.size) * 3);
        for (index, value) in self.square_values().enumerate() {
            if index > 0 {
                text.push(' ');
            }
            write!(&mut text, "{value}").unwrap();
        }
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let values: Vec<&str> = text.split_whitespace().collect();
        let size = u8::try_from(values.len())
            .map_err(|_| serde::de::Error::custom(format!("board too large: {}", values.len())))?;
        let mut board = Self::new(size).map_err(serde::de::Error::custom)?;
        for (index, value) in values.iter().enumerate() {
            let square = u8::try_from(index + 1).map_err(serde::de::Error::custom)?;
            let value: u8 = value.parse().map_err(|e| {
                serde::de::Error::custom(format!("invalid square value at {square}: {value} ({e})"))
            })?;
            if value == 0 {
                board.covered |= Self::mask(square);
            } else if value != square {
                return Err(serde::de::Error::custom(format!(
                    "square {square} must hold 0 or {square}, got {value}"
                )));
            }
        }
        Ok(board)
    }
}
