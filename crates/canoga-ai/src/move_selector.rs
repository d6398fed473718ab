use canoga_engine::{DiceCount, Move, MoveKind, PlayerId, Round};

/// A proposed move together with the strategy behind it.
///
/// `mv` is `None` when the roll admits no legal move at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub mv: Option<Move>,
    pub reason: String,
}

/// Chooses a move for `actor` at the given dice total.
///
/// The policy, in order:
///
/// 1. a covering move that covers every remaining own square wins outright;
/// 2. an uncovering move that clears every covered opponent square wins
///    outright;
/// 3. otherwise cover when possible, uncover when not;
/// 4. within the chosen kind, take the combination touching the most
///    squares, breaking ties by its highest single square.
#[must_use]
pub fn suggest_move(round: &Round, actor: PlayerId, dice_total: u8) -> Suggestion {
    let cover_options = round.legal_moves(actor, MoveKind::Cover, dice_total);
    let uncover_options = round.legal_moves(actor, MoveKind::Uncover, dice_total);

    if cover_options.is_empty() && uncover_options.is_empty() {
        return Suggestion {
            mv: None,
            reason: "no legal moves for this roll".to_owned(),
        };
    }

    let own_uncovered = round.board(actor).uncovered_count();
    if let Some(mv) = cover_options
        .iter()
        .find(|m| m.square_count() == own_uncovered)
    {
        return Suggestion {
            mv: Some(mv.clone()),
            reason: format!(
                "covering {} finishes the board and wins the round at once",
                squares_text(mv)
            ),
        };
    }

    let opponent_covered = round.board(actor.opponent()).covered_count();
    if let Some(mv) = uncover_options
        .iter()
        .find(|m| m.square_count() == opponent_covered)
    {
        return Suggestion {
            mv: Some(mv.clone()),
            reason: format!(
                "uncovering {} empties the opponent's board and wins the round at once",
                squares_text(mv)
            ),
        };
    }

    let covering = !cover_options.is_empty();
    let candidates = if covering {
        cover_options
    } else {
        uncover_options
    };
    let best = candidates
        .into_iter()
        .max_by_key(|m| (m.square_count(), m.highest_square()));
    let Some(best) = best else {
        // Unreachable: the chosen candidate set is non-empty.
        return Suggestion {
            mv: None,
            reason: "no legal moves for this roll".to_owned(),
        };
    };

    let reason = if covering {
        format!(
            "covering {} keeps the most score out of the opponent's reach, \
             using the most squares and the highest value available",
            squares_text(&best)
        )
    } else {
        format!(
            "no cover fits this total; uncovering {} sets the opponent back \
             the furthest",
            squares_text(&best)
        )
    };
    Suggestion {
        mv: Some(best),
        reason,
    }
}

/// One die whenever the rules allow it, otherwise two.
#[must_use]
pub fn preferred_dice_count(round: &Round, actor: PlayerId) -> DiceCount {
    if round.can_use_one_die(actor) {
        DiceCount::One
    } else {
        DiceCount::Two
    }
}

fn squares_text(mv: &Move) -> String {
    let squares: Vec<String> = mv.squares.iter().map(ToString::to_string).collect();
    squares.join(", ")
}
