use canoga_engine::{
    AdvantageLock, Board, Dice, DiceRoll, PlayerId, PlayerPair, RestoreError, Round, RoundParts,
    Tournament, TurnPhase, WinType,
};
use serde::{Deserialize, Serialize};

/// A flattened picture of a match at one instant.
///
/// Pure data with no identity: two snapshots captured from equivalent
/// states compare equal, and restoring one yields fresh engine values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub boards: PlayerPair<Board>,
    pub scores: PlayerPair<u32>,
    pub first_turn: PlayerId,
    pub next_turn: PlayerId,
    pub phase: TurnPhase,
    pub pending_dice: Option<DiceRoll>,
    pub advantage_lock: Option<AdvantageLock>,
    pub queued_rolls: Vec<DiceRoll>,
}

/// Fresh engine values rebuilt from a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct RestoredState {
    pub round: Round,
    pub tournament: Tournament,
    pub dice: Dice,
}

impl Snapshot {
    /// Captures the current state of a match.
    #[must_use]
    pub fn capture(round: &Round, tournament: &Tournament, dice: &Dice) -> Self {
        Self {
            boards: PlayerPair::new(
                round.board(PlayerId::Human).clone(),
                round.board(PlayerId::Computer).clone(),
            ),
            scores: tournament.scores(),
            first_turn: round.first_player(),
            next_turn: round.current_player(),
            phase: round.phase(),
            pending_dice: round.pending_roll(),
            advantage_lock: round.advantage_lock(),
            queued_rolls: dice.queued().collect(),
        }
    }

    /// Rebuilds a live round, tournament and dice from this snapshot.
    ///
    /// A resumed round counts both players as having moved, so the win
    /// conditions work immediately; whether each board "was covered this
    /// round" is taken from its current covered squares. For a finished
    /// round the winner and score are re-derived from the board shapes.
    pub fn restore(&self) -> Result<RestoredState, RestoreError> {
        let (winner, win_type, round_score) = self.derive_outcome();
        let round = Round::from_parts(RoundParts {
            boards: self.boards.clone(),
            first_player: self.first_turn,
            current_player: self.next_turn,
            phase: self.phase,
            pending_roll: self.pending_dice,
            advantage_lock: self.advantage_lock,
            has_moved: PlayerPair::new(true, true),
            ever_covered: PlayerPair::new(
                self.boards[PlayerId::Human].covered_count() > 0,
                self.boards[PlayerId::Computer].covered_count() > 0,
            ),
            winner,
            win_type,
            round_score,
        })?;
        let tournament = Tournament::restore(round.board_size(), self.scores)
            .map_err(RestoreError::Config)?;
        let mut dice = Dice::new();
        for roll in &self.queued_rolls {
            dice.enqueue(*roll);
        }
        Ok(RestoredState {
            round,
            tournament,
            dice,
        })
    }

    fn derive_outcome(&self) -> (Option<PlayerId>, Option<WinType>, u32) {
        if !self.phase.is_round_over() {
            return (None, None, 0);
        }
        for player in PlayerId::BOTH {
            let opponent = player.opponent();
            if self.boards[player].all_covered() {
                let score = self.boards[opponent].sum_uncovered();
                return (Some(player), Some(WinType::Cover), score);
            }
            if self.boards[opponent].all_uncovered() {
                let score = self.boards[player].sum_covered();
                return (Some(player), Some(WinType::Uncover), score);
            }
        }
        (None, None, 0)
    }
}
