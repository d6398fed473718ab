use crate::{
    ConfigError, WrongPhaseError,
    core::{
        board::{MAX_BOARD_SIZE, MIN_BOARD_SIZE},
        moves::Advantage,
        player::{PlayerId, PlayerPair},
    },
    engine::round::Round,
};

/// The ongoing match: cumulative scores, the round counter, and the
/// handicap pending for the next round.
///
/// A tournament never mutates a live round; it constructs rounds and scores
/// finished ones. Cumulative scores only ever grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    board_size: u8,
    scores: PlayerPair<u32>,
    round_number: u32,
    pending_advantage: Option<Advantage>,
}

impl Tournament {
    pub fn new(board_size: u8) -> Result<Self, ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&board_size) {
            return Err(ConfigError::BoardSize(board_size));
        }
        Ok(Self {
            board_size,
            scores: PlayerPair::new(0, 0),
            round_number: 0,
            pending_advantage: None,
        })
    }

    /// Rebuilds a tournament from a snapshot's scores. The restored state
    /// counts as round one with no handicap pending, matching how saved
    /// games are resumed.
    pub fn restore(board_size: u8, scores: PlayerPair<u32>) -> Result<Self, ConfigError> {
        let mut tournament = Self::new(board_size)?;
        tournament.scores = scores;
        tournament.round_number = 1;
        Ok(tournament)
    }

    #[must_use]
    pub fn board_size(&self) -> u8 {
        self.board_size
    }

    #[must_use]
    pub fn score(&self, id: PlayerId) -> u32 {
        self.scores[id]
    }

    #[must_use]
    pub fn scores(&self) -> PlayerPair<u32> {
        self.scores
    }

    /// Number of rounds started so far.
    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    #[must_use]
    pub fn pending_advantage(&self) -> Option<Advantage> {
        self.pending_advantage
    }

    /// Starts the next round, seeding it with any pending handicap.
    ///
    /// The board size may change between rounds; a pending advantage square
    /// that no longer fits the new board is dropped.
    pub fn start_round(
        &mut self,
        board_size: u8,
        first_player: PlayerId,
    ) -> Result<Round, ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&board_size) {
            return Err(ConfigError::BoardSize(board_size));
        }
        self.board_size = board_size;
        self.round_number += 1;
        let advantage = self
            .pending_advantage
            .take()
            .filter(|a| (1..=board_size).contains(&a.square));
        Round::new(board_size, first_player, advantage)
    }

    /// Credits a finished round to its winner and computes the handicap for
    /// the next round.
    ///
    /// The advantage square is the digit sum of the winning score. A winner
    /// who also moved first that round passes the advantage to the other
    /// player instead of keeping it, so holding the first-move edge does not
    /// compound into the handicap bonus.
    pub fn record_round(&mut self, round: &Round) -> Result<(), WrongPhaseError> {
        if !round.is_over() {
            return Err(WrongPhaseError);
        }
        self.pending_advantage = None;
        let Some(winner) = round.winner() else {
            return Ok(());
        };
        let score = round.round_score();
        self.scores[winner] += score;
        if score == 0 {
            return Ok(());
        }
        let square = digit_sum(score);
        if !(1..=u32::from(self.board_size)).contains(&square) {
            return Ok(());
        }
        let recipient = if winner == round.first_player() {
            winner.opponent()
        } else {
            winner
        };
        self.pending_advantage = Some(Advantage {
            player: recipient,
            square: square as u8,
        });
        Ok(())
    }

    /// The side with the higher cumulative score, or `None` on a tie.
    #[must_use]
    pub fn tournament_winner(&self) -> Option<PlayerId> {
        let human = self.scores[PlayerId::Human];
        let computer = self.scores[PlayerId::Computer];
        match human.cmp(&computer) {
            std::cmp::Ordering::Greater => Some(PlayerId::Human),
            std::cmp::Ordering::Less => Some(PlayerId::Computer),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Reduces `n` to a single decimal digit by repeated digit summation.
#[must_use]
pub fn digit_sum(mut n: u32) -> u32 {
    loop {
        let mut sum = 0;
        while n > 0 {
            sum += n % 10;
            n /= 10;
        }
        if sum < 10 {
            return sum;
        }
        n = sum;
    }
}
