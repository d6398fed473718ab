use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, MoveError, OutOfRangeError, RestoreError, RollError, WrongPhaseError,
    core::{
        board::Board,
        dice::{Dice, DiceCount, DiceRoll},
        moves::{Advantage, AdvantageLock, Move, MoveKind},
        player::{PlayerId, PlayerPair},
    },
};

/// Where a round currently stands.
///
/// `AwaitingMove` is entered only when the pending roll admits at least one
/// legal combination; a dead roll leaves the phase at `AwaitingRoll` and the
/// turn passes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum TurnPhase {
    AwaitingRoll,
    AwaitingMove,
    RoundOver,
}

/// How a round was won.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
pub enum WinType {
    Cover,
    Uncover,
}

/// One round of play over two boards.
///
/// All mutation goes through [`roll`](Self::roll), [`apply`](Self::apply),
/// [`notify_turn_ended`](Self::notify_turn_ended) and
/// [`switch_turn`](Self::switch_turn); every operation validates fully
/// before touching state, and once the round is over the value is frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    board_size: u8,
    boards: PlayerPair<Board>,
    first_player: PlayerId,
    current_player: PlayerId,
    phase: TurnPhase,
    pending_roll: Option<DiceRoll>,
    advantage_lock: Option<AdvantageLock>,
    has_moved: PlayerPair<bool>,
    ever_covered: PlayerPair<bool>,
    winner: Option<PlayerId>,
    win_type: Option<WinType>,
    round_score: u32,
}

/// The complete state of a mid-round game, used to rebuild a [`Round`]
/// from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundParts {
    pub boards: PlayerPair<Board>,
    pub first_player: PlayerId,
    pub current_player: PlayerId,
    pub phase: TurnPhase,
    pub pending_roll: Option<DiceRoll>,
    pub advantage_lock: Option<AdvantageLock>,
    pub has_moved: PlayerPair<bool>,
    pub ever_covered: PlayerPair<bool>,
    pub winner: Option<PlayerId>,
    pub win_type: Option<WinType>,
    pub round_score: u32,
}

impl Round {
    /// Starts a round with both boards fully uncovered, pre-covering the
    /// advantage square (and installing its lock) when a handicap is carried
    /// in. An advantage square outside the board is ignored.
    pub fn new(
        board_size: u8,
        first_player: PlayerId,
        advantage: Option<Advantage>,
    ) -> Result<Self, ConfigError> {
        let boards = PlayerPair::new(Board::new(board_size)?, Board::new(board_size)?);
        let mut round = Self {
            board_size,
            boards,
            first_player,
            current_player: first_player,
            phase: TurnPhase::AwaitingRoll,
            pending_roll: None,
            advantage_lock: None,
            has_moved: PlayerPair::new(false, false),
            ever_covered: PlayerPair::new(false, false),
            winner: None,
            win_type: None,
            round_score: 0,
        };
        if let Some(advantage) = advantage {
            if round.boards[advantage.player]
                .set_covered(advantage.square, true)
                .is_ok()
            {
                round.ever_covered[advantage.player] = true;
                round.advantage_lock = Some(AdvantageLock::new(advantage));
            }
        }
        Ok(round)
    }

    #[must_use]
    pub fn board_size(&self) -> u8 {
        self.board_size
    }

    #[must_use]
    pub fn board(&self, id: PlayerId) -> &Board {
        &self.boards[id]
    }

    #[must_use]
    pub fn first_player(&self) -> PlayerId {
        self.first_player
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn pending_roll(&self) -> Option<DiceRoll> {
        self.pending_roll
    }

    #[must_use]
    pub fn advantage_lock(&self) -> Option<AdvantageLock> {
        self.advantage_lock
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_round_over()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn win_type(&self) -> Option<WinType> {
        self.win_type
    }

    /// The score the round was won by; 0 while the round is live.
    #[must_use]
    pub fn round_score(&self) -> u32 {
        self.round_score
    }

    #[must_use]
    pub fn has_moved(&self, id: PlayerId) -> bool {
        self.has_moved[id]
    }

    #[must_use]
    pub fn can_use_one_die(&self, id: PlayerId) -> bool {
        self.boards[id].can_use_one_die()
    }

    /// Rolls for the current player.
    ///
    /// When the total admits at least one legal combination the phase moves
    /// to `AwaitingMove`; otherwise the roll is discarded, the phase stays at
    /// `AwaitingRoll` and the driver should end the turn.
    pub fn roll(&mut self, dice: &mut Dice, count: DiceCount) -> Result<DiceRoll, RollError> {
        if !self.phase.is_awaiting_roll() {
            return Err(RollError::WrongPhase);
        }
        if count == DiceCount::One && !self.can_use_one_die(self.current_player) {
            return Err(RollError::OneDieNotAllowed);
        }
        let roll = dice.roll(count);
        let total = roll.total();
        let actor = self.current_player;
        let has_moves = !self.legal_moves(actor, MoveKind::Cover, total).is_empty()
            || !self.legal_moves(actor, MoveKind::Uncover, total).is_empty();
        if has_moves {
            self.pending_roll = Some(roll);
            self.phase = TurnPhase::AwaitingMove;
        }
        Ok(roll)
    }

    /// Every legal move for `actor` of the given kind at the given total.
    ///
    /// Cover moves target the actor's own board, uncover moves the
    /// opponent's; an active advantage lock withholds its square from the
    /// uncover candidates.
    #[must_use]
    pub fn legal_moves(&self, actor: PlayerId, kind: MoveKind, dice_total: u8) -> Vec<Move> {
        let target_owner = match kind {
            MoveKind::Cover => actor,
            MoveKind::Uncover => actor.opponent(),
        };
        let blocked = match kind {
            MoveKind::Cover => None,
            MoveKind::Uncover => self
                .advantage_lock
                .and_then(|lock| lock.blocked_square_for(target_owner)),
        };
        self.boards[target_owner]
            .find_combinations(dice_total, kind, blocked)
            .into_iter()
            .map(|squares| Move {
                actor,
                kind,
                dice_total,
                squares,
            })
            .collect()
    }

    /// Applies a move chosen from the current legal set.
    ///
    /// All checks run before any square is toggled, so a rejected move
    /// leaves the round untouched.
    pub fn apply(&mut self, mv: &Move) -> Result<(), MoveError> {
        if !self.phase.is_awaiting_move() {
            return Err(MoveError::WrongPhase);
        }
        let Some(pending) = self.pending_roll else {
            return Err(MoveError::WrongPhase);
        };
        if mv.actor != self.current_player || mv.dice_total != pending.total() {
            return Err(MoveError::InvalidMove);
        }
        for &square in &mv.squares {
            if !(1..=self.board_size).contains(&square) {
                return Err(MoveError::OutOfRange(OutOfRangeError {
                    square,
                    size: self.board_size,
                }));
            }
        }
        let legal = self.legal_moves(mv.actor, mv.kind, mv.dice_total);
        if !legal.iter().any(|m| m.squares == mv.squares) {
            return Err(MoveError::InvalidMove);
        }

        let target_owner = match mv.kind {
            MoveKind::Cover => mv.actor,
            MoveKind::Uncover => mv.actor.opponent(),
        };
        for &square in &mv.squares {
            self.boards[target_owner]
                .set_covered(square, mv.kind == MoveKind::Cover)
                .map_err(MoveError::OutOfRange)?;
        }
        if mv.kind == MoveKind::Cover {
            self.ever_covered[target_owner] = true;
        }
        self.has_moved[mv.actor] = true;
        self.pending_roll = None;
        self.phase = TurnPhase::AwaitingRoll;
        self.check_round_end();
        Ok(())
    }

    /// Records that `player`'s turn has concluded, whether or not they moved.
    ///
    /// This is what expires the advantage protection: the lock opens once the
    /// holder's opponent has completed one full turn.
    pub fn notify_turn_ended(&mut self, player: PlayerId) {
        if let Some(lock) = &mut self.advantage_lock {
            if !lock.unlocked && player == lock.holder.opponent() {
                lock.unlocked = true;
            }
        }
        self.check_round_end();
    }

    /// Hands the turn to the other player, discarding any unconfirmed roll.
    pub fn switch_turn(&mut self) -> Result<(), WrongPhaseError> {
        if self.phase.is_round_over() {
            return Err(WrongPhaseError);
        }
        self.current_player = self.current_player.opponent();
        self.pending_roll = None;
        self.phase = TurnPhase::AwaitingRoll;
        Ok(())
    }

    /// Evaluates the round-end condition.
    ///
    /// Gated on both players having moved at least once this round, since a
    /// fresh board is fully uncovered, which is itself a win shape. For each
    /// player in `Human, Computer` order the cover win is checked before the
    /// uncover win; the first match freezes the round.
    fn check_round_end(&mut self) {
        if self.phase.is_round_over() {
            return;
        }
        if !(self.has_moved[PlayerId::Human] && self.has_moved[PlayerId::Computer]) {
            return;
        }
        for player in PlayerId::BOTH {
            let opponent = player.opponent();
            if self.boards[player].all_covered() {
                self.declare_win(player, WinType::Cover, self.boards[opponent].sum_uncovered());
                return;
            }
            if self.boards[opponent].all_uncovered() && self.ever_covered[opponent] {
                self.declare_win(player, WinType::Uncover, self.boards[player].sum_covered());
                return;
            }
        }
    }

    fn declare_win(&mut self, winner: PlayerId, win_type: WinType, score: u32) {
        self.winner = Some(winner);
        self.win_type = Some(win_type);
        self.round_score = score;
        self.pending_roll = None;
        self.phase = TurnPhase::RoundOver;
    }

    /// Decomposes the round into plain data, for snapshotting.
    #[must_use]
    pub fn to_parts(&self) -> RoundParts {
        RoundParts {
            boards: self.boards.clone(),
            first_player: self.first_player,
            current_player: self.current_player,
            phase: self.phase,
            pending_roll: self.pending_roll,
            advantage_lock: self.advantage_lock,
            has_moved: self.has_moved,
            ever_covered: self.ever_covered,
            winner: self.winner,
            win_type: self.win_type,
            round_score: self.round_score,
        }
    }

    /// Rebuilds a round from plain data, validating its consistency.
    pub fn from_parts(parts: RoundParts) -> Result<Self, RestoreError> {
        let board_size = parts.boards[PlayerId::Human].size();
        if parts.boards[PlayerId::Computer].size() != board_size {
            return Err(RestoreError::MismatchedBoardSizes);
        }
        if let Some(lock) = parts.advantage_lock {
            if !(1..=board_size).contains(&lock.square) {
                return Err(RestoreError::LockSquareOutOfRange(lock.square));
            }
        }
        if parts.phase.is_awaiting_move() && parts.pending_roll.is_none() {
            return Err(RestoreError::MissingPendingRoll);
        }
        Ok(Self {
            board_size,
            boards: parts.boards,
            first_player: parts.first_player,
            current_player: parts.current_player,
            phase: parts.phase,
            pending_roll: parts.pending_roll,
            advantage_lock: parts.advantage_lock,
            has_moved: parts.has_moved,
            ever_covered: parts.ever_covered,
            winner: parts.winner,
            win_type: parts.win_type,
            round_score: parts.round_score,
        })
    }
}
