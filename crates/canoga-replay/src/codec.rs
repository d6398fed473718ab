use std::fmt::Write as _;

use canoga_engine::{AdvantageLock, Board, DiceRoll, PlayerId, PlayerPair, TurnPhase};

use crate::{Snapshot, SnapshotError};

const PHASE_AWAITING_ROLL: &str = "awaiting roll";
const PHASE_AWAITING_MOVE: &str = "awaiting move";
const PHASE_ROUND_OVER: &str = "round over";

/// Renders a snapshot into the textual save format.
///
/// The four mandatory sections come first in fixed order, followed by
/// `#`-prefixed metadata for anything beyond a between-turns state.
#[must_use]
pub fn serialize(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    write_block(&mut out, "Computer", snapshot, PlayerId::Computer);
    write_block(&mut out, "Human", snapshot, PlayerId::Human);
    writeln!(out, "First Turn: {}", snapshot.first_turn).unwrap();
    writeln!(out, "Next Turn: {}", snapshot.next_turn).unwrap();

    writeln!(out, "# Phase: {}", phase_text(snapshot.phase)).unwrap();
    if let Some(dice) = snapshot.pending_dice {
        writeln!(out, "# CurrentDice: {}", roll_text(dice)).unwrap();
    }
    if let Some(lock) = snapshot.advantage_lock {
        let state = if lock.unlocked { "unlocked" } else { "locked" };
        writeln!(out, "# AdvantageLock: {} {} {}", lock.holder, lock.square, state).unwrap();
    }
    if !snapshot.queued_rolls.is_empty() {
        let rolls: Vec<String> = snapshot.queued_rolls.iter().map(|r| roll_text(*r)).collect();
        writeln!(out, "# QueuedRolls: {}", rolls.join(", ")).unwrap();
    }
    out
}

/// Decodes the textual save format back into a [`Snapshot`].
///
/// The metadata block may be absent entirely; defaults are a between-turns
/// state with no pending dice, no lock and an empty roll queue.
pub fn deserialize(text: &str) -> Result<Snapshot, SnapshotError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    let (computer_board, computer_score) = parse_block(&mut lines, "Computer")?;
    let (human_board, human_score) = parse_block(&mut lines, "Human")?;
    if human_board.size() != computer_board.size() {
        return Err(SnapshotError::MismatchedBoards);
    }
    let first_turn = parse_player_line(&mut lines, "First Turn")?;
    let next_turn = parse_player_line(&mut lines, "Next Turn")?;

    let mut snapshot = Snapshot {
        boards: PlayerPair::new(human_board, computer_board),
        scores: PlayerPair::new(human_score, computer_score),
        first_turn,
        next_turn,
        phase: TurnPhase::AwaitingRoll,
        pending_dice: None,
        advantage_lock: None,
        queued_rolls: Vec::new(),
    };

    for line in lines {
        let Some(metadata) = line.strip_prefix('#') else {
            return Err(SnapshotError::Malformed {
                context: "metadata",
                value: line.to_owned(),
            });
        };
        let Some((key, value)) = metadata.split_once(':') else {
            return Err(SnapshotError::Malformed {
                context: "metadata",
                value: line.to_owned(),
            });
        };
        let value = value.trim();
        match key.trim() {
            "Phase" => snapshot.phase = parse_phase(value)?,
            "CurrentDice" => snapshot.pending_dice = Some(parse_roll(value, "CurrentDice")?),
            "AdvantageLock" => snapshot.advantage_lock = Some(parse_lock(value)?),
            "QueuedRolls" => snapshot.queued_rolls = parse_queue(value)?,
            // Unknown metadata keys are skipped, like any absent metadata.
            _ => {}
        }
    }
    Ok(snapshot)
}

fn write_block(out: &mut String, label: &str, snapshot: &Snapshot, id: PlayerId) {
    writeln!(out, "{label}:").unwrap();
    let values: Vec<String> = snapshot.boards[id]
        .square_values()
        .map(|v| v.to_string())
        .collect();
    writeln!(out, "   Squares: {}", values.join(" ")).unwrap();
    writeln!(out, "   Score: {}", snapshot.scores[id]).unwrap();
}

fn phase_text(phase: TurnPhase) -> &'static str {
    match phase {
        TurnPhase::AwaitingRoll => PHASE_AWAITING_ROLL,
        TurnPhase::AwaitingMove => PHASE_AWAITING_MOVE,
        TurnPhase::RoundOver => PHASE_ROUND_OVER,
    }
}

fn roll_text(roll: DiceRoll) -> String {
    match roll.second() {
        Some(second) => format!("{} {}", roll.first(), second),
        None => roll.first().to_string(),
    }
}

fn parse_block<'a, I>(
    lines: &mut I,
    label: &'static str,
) -> Result<(Board, u32), SnapshotError>
where
    I: Iterator<Item = &'a str>,
{
    let header = lines.next().ok_or(SnapshotError::MissingSection(label))?;
    if !header.starts_with(label) {
        return Err(SnapshotError::MissingSection(label));
    }
    let squares_line = lines.next().ok_or(SnapshotError::MissingSection("Squares"))?;
    let Some(squares) = squares_line.strip_prefix("Squares:") else {
        return Err(SnapshotError::MissingSection("Squares"));
    };
    let board = parse_board(squares)?;

    let score_line = lines.next().ok_or(SnapshotError::MissingSection("Score"))?;
    let Some(score) = score_line.strip_prefix("Score:") else {
        return Err(SnapshotError::MissingSection("Score"));
    };
    let score = score
        .trim()
        .parse()
        .map_err(|_| SnapshotError::Malformed {
            context: "Score",
            value: score.trim().to_owned(),
        })?;
    Ok((board, score))
}

fn parse_board(squares: &str) -> Result<Board, SnapshotError> {
    let values: Vec<&str> = squares.split_whitespace().collect();
    let size = u8::try_from(values.len()).map_err(|_| SnapshotError::BoardSize(values.len()))?;
    let mut board = Board::new(size).map_err(|_| SnapshotError::BoardSize(values.len()))?;
    for (index, value) in values.iter().enumerate() {
        let square = index + 1;
        let parsed: u64 = value.parse().map_err(|_| SnapshotError::CorruptSquare {
            square,
            value: (*value).to_owned(),
        })?;
        if parsed == 0 {
            // In-range by construction.
            let _ = board.set_covered(square as u8, true);
        } else if parsed != square as u64 {
            return Err(SnapshotError::CorruptSquare {
                square,
                value: (*value).to_owned(),
            });
        }
    }
    Ok(board)
}

fn parse_player_line<'a, I>(
    lines: &mut I,
    label: &'static str,
) -> Result<PlayerId, SnapshotError>
where
    I: Iterator<Item = &'a str>,
{
    let line = lines.next().ok_or(SnapshotError::MissingSection(label))?;
    let Some(value) = line.strip_prefix(label) else {
        return Err(SnapshotError::MissingSection(label));
    };
    let Some(value) = value.trim_start().strip_prefix(':') else {
        return Err(SnapshotError::MissingSection(label));
    };
    parse_player(value.trim(), label)
}

fn parse_player(value: &str, context: &'static str) -> Result<PlayerId, SnapshotError> {
    value.parse().map_err(|_| SnapshotError::Malformed {
        context,
        value: value.to_owned(),
    })
}

fn parse_phase(value: &str) -> Result<TurnPhase, SnapshotError> {
    match value {
        PHASE_AWAITING_ROLL => Ok(TurnPhase::AwaitingRoll),
        PHASE_AWAITING_MOVE => Ok(TurnPhase::AwaitingMove),
        PHASE_ROUND_OVER => Ok(TurnPhase::RoundOver),
        _ => Err(SnapshotError::Malformed {
            context: "Phase",
            value: value.to_owned(),
        }),
    }
}

fn parse_roll(value: &str, context: &'static str) -> Result<DiceRoll, SnapshotError> {
    let malformed = || SnapshotError::Malformed {
        context,
        value: value.to_owned(),
    };
    let mut dies = value.split_whitespace();
    let first: u8 = dies
        .next()
        .ok_or_else(malformed)?
        .parse()
        .map_err(|_| malformed())?;
    let second: Option<u8> = dies
        .next()
        .map(|die| die.parse().map_err(|_| malformed()))
        .transpose()?;
    if dies.next().is_some() {
        return Err(malformed());
    }
    DiceRoll::new(first, second).map_err(|_| malformed())
}

fn parse_lock(value: &str) -> Result<AdvantageLock, SnapshotError> {
    let malformed = || SnapshotError::Malformed {
        context: "AdvantageLock",
        value: value.to_owned(),
    };
    let mut tokens = value.split_whitespace();
    let holder = parse_player(tokens.next().ok_or_else(malformed)?, "AdvantageLock")?;
    let square: u8 = tokens
        .next()
        .ok_or_else(malformed)?
        .parse()
        .map_err(|_| malformed())?;
    let unlocked = match tokens.next() {
        Some("locked") | None => false,
        Some("unlocked") => true,
        Some(_) => return Err(malformed()),
    };
    if tokens.next().is_some() {
        return Err(malformed());
    }
    Ok(AdvantageLock {
        holder,
        square,
        unlocked,
    })
}

fn parse_queue(value: &str) -> Result<Vec<DiceRoll>, SnapshotError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|roll| parse_roll(roll.trim(), "QueuedRolls"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canoga_engine::{Dice, DiceCount, DiceSeed, Tournament};

    fn sample_text() -> String {
        [
            "Computer:",
            "   Squares: 1 2 0 4 5 6 7 8 9",
            "   Score: 12",
            "Human:",
            "   Squares: 1 2 3 4 5 6 7 8 0",
            "   Score: 23",
            "First Turn: Human",
            "Next Turn: Computer",
        ]
        .join("\n")
    }

    #[test]
    fn test_deserialize_mandatory_blocks() {
        let snapshot = deserialize(&sample_text()).unwrap();
        assert_eq!(snapshot.scores[PlayerId::Human], 23);
        assert_eq!(snapshot.scores[PlayerId::Computer], 12);
        assert_eq!(snapshot.first_turn, PlayerId::Human);
        assert_eq!(snapshot.next_turn, PlayerId::Computer);
        assert!(snapshot.boards[PlayerId::Computer].is_covered(3).unwrap());
        assert!(snapshot.boards[PlayerId::Human].is_covered(9).unwrap());
        assert_eq!(snapshot.boards[PlayerId::Human].covered_count(), 1);
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let snapshot = deserialize(&sample_text()).unwrap();
        assert!(snapshot.phase.is_awaiting_roll());
        assert_eq!(snapshot.pending_dice, None);
        assert_eq!(snapshot.advantage_lock, None);
        assert!(snapshot.queued_rolls.is_empty());
    }

    #[test]
    fn test_metadata_lines_parse_in_any_order() {
        let text = format!(
            "{}\n# QueuedRolls: 3 4, 2\n# AdvantageLock: Human 5 locked\n\
             # CurrentDice: 6 1\n# Phase: awaiting move\n",
            sample_text()
        );
        let snapshot = deserialize(&text).unwrap();
        assert!(snapshot.phase.is_awaiting_move());
        assert_eq!(snapshot.pending_dice.unwrap().total(), 7);
        let lock = snapshot.advantage_lock.unwrap();
        assert_eq!((lock.holder, lock.square, lock.unlocked), (PlayerId::Human, 5, false));
        assert_eq!(snapshot.queued_rolls.len(), 2);
        assert_eq!(snapshot.queued_rolls[0].total(), 7);
        assert_eq!(snapshot.queued_rolls[1].total(), 2);
    }

    #[test]
    fn test_round_trip_between_turns() {
        let snapshot = deserialize(&sample_text()).unwrap();
        let text = serialize(&snapshot);
        assert_eq!(deserialize(&text).unwrap(), snapshot);
    }

    #[test]
    fn test_round_trip_mid_turn() {
        let mut tournament = Tournament::new(9).unwrap();
        let mut round = tournament.start_round(9, PlayerId::Computer).unwrap();
        let mut dice = Dice::with_seed(DiceSeed::from(3));
        dice.enqueue(DiceRoll::new(5, Some(4)).unwrap());
        round.roll(&mut dice, DiceCount::Two).unwrap();
        dice.enqueue(DiceRoll::new(1, None).unwrap());

        let snapshot = Snapshot::capture(&round, &tournament, &dice);
        let text = serialize(&snapshot);
        assert_eq!(deserialize(&text).unwrap(), snapshot);
    }

    #[test]
    fn test_round_trip_after_a_win() {
        // A finished round: the human board is fully covered.
        let text = sample_text()
            .replace("1 2 3 4 5 6 7 8 0", "0 0 0 0 0 0 0 0 0")
            + "\n# Phase: round over\n";
        let snapshot = deserialize(&text).unwrap();
        assert!(snapshot.phase.is_round_over());
        assert_eq!(deserialize(&serialize(&snapshot)).unwrap(), snapshot);

        let restored = snapshot.restore().unwrap();
        assert!(restored.round.is_over());
        assert_eq!(restored.round.winner(), Some(PlayerId::Human));
    }

    #[test]
    fn test_serialized_shape_is_stable() {
        let snapshot = deserialize(&sample_text()).unwrap();
        let text = serialize(&snapshot);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Computer:");
        assert_eq!(lines[1], "   Squares: 1 2 0 4 5 6 7 8 9");
        assert_eq!(lines[2], "   Score: 12");
        assert_eq!(lines[3], "Human:");
        assert_eq!(lines[6], "First Turn: Human");
        assert_eq!(lines[7], "Next Turn: Computer");
        assert_eq!(lines[8], "# Phase: awaiting roll");
    }

    #[test]
    fn test_missing_sections_are_rejected() {
        assert_eq!(
            deserialize("").unwrap_err(),
            SnapshotError::MissingSection("Computer")
        );

        let no_human: String = sample_text().lines().take(3).collect::<Vec<_>>().join("\n");
        assert_eq!(
            deserialize(&no_human).unwrap_err(),
            SnapshotError::MissingSection("Human")
        );

        let no_turns: String = sample_text().lines().take(6).collect::<Vec<_>>().join("\n");
        assert_eq!(
            deserialize(&no_turns).unwrap_err(),
            SnapshotError::MissingSection("First Turn")
        );
    }

    #[test]
    fn test_corrupt_square_values_are_rejected() {
        let text = sample_text().replace("1 2 0 4 5 6 7 8 9", "1 2 9 4 5 6 7 8 9");
        assert_eq!(
            deserialize(&text).unwrap_err(),
            SnapshotError::CorruptSquare {
                square: 3,
                value: "9".to_owned(),
            }
        );

        let text = sample_text().replace("1 2 0 4 5 6 7 8 9", "1 2 x 4 5 6 7 8 9");
        assert!(matches!(
            deserialize(&text).unwrap_err(),
            SnapshotError::CorruptSquare { square: 3, .. }
        ));
    }

    #[test]
    fn test_board_length_problems_are_rejected() {
        let text = sample_text().replace("1 2 0 4 5 6 7 8 9", "1 2 0 4");
        assert_eq!(deserialize(&text).unwrap_err(), SnapshotError::BoardSize(4));

        let text = sample_text().replace("1 2 3 4 5 6 7 8 0", "1 2 3 4 5 6 7 8 0 10");
        assert_eq!(
            deserialize(&text).unwrap_err(),
            SnapshotError::MismatchedBoards
        );
    }

    #[test]
    fn test_bad_player_and_phase_are_rejected() {
        let text = sample_text().replace("Next Turn: Computer", "Next Turn: Nobody");
        assert!(matches!(
            deserialize(&text).unwrap_err(),
            SnapshotError::Malformed {
                context: "Next Turn",
                ..
            }
        ));

        let text = format!("{}\n# Phase: paused", sample_text());
        assert!(matches!(
            deserialize(&text).unwrap_err(),
            SnapshotError::Malformed { context: "Phase", .. }
        ));
    }

    #[test]
    fn test_bad_dice_metadata_is_rejected() {
        let text = format!("{}\n# CurrentDice: 7 1", sample_text());
        assert!(deserialize(&text).is_err());
        let text = format!("{}\n# QueuedRolls: 3 4 5", sample_text());
        assert!(deserialize(&text).is_err());
    }

    #[test]
    fn test_restored_match_resumes_from_text() {
        let text = format!("{}\n# Phase: awaiting roll", sample_text());
        let snapshot = deserialize(&text).unwrap();
        let restored = snapshot.restore().unwrap();
        assert_eq!(restored.round.current_player(), PlayerId::Computer);
        assert_eq!(restored.tournament.score(PlayerId::Human), 23);
        assert_eq!(restored.tournament.score(PlayerId::Computer), 12);
    }
}
