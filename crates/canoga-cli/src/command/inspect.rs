use std::{fs, path::PathBuf};

use anyhow::Context as _;
use canoga_engine::PlayerId;
use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct InspectArg {
    /// Snapshot file to read
    file: PathBuf,

    /// Emit the snapshot as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let text = fs::read_to_string(&arg.file)
        .with_context(|| format!("failed to read {}", arg.file.display()))?;
    let snapshot = canoga_replay::deserialize(&text)
        .with_context(|| format!("corrupt save file {}", arg.file.display()))?;

    if arg.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let board_size = snapshot.boards[PlayerId::Human].size();
    println!("board size: {board_size}");
    for id in PlayerId::BOTH {
        let board = &snapshot.boards[id];
        println!(
            "{id}: score {}, {} of {board_size} squares covered",
            snapshot.scores[id],
            board.covered_count(),
        );
    }
    println!("first turn: {}", snapshot.first_turn);
    println!("next turn: {}", snapshot.next_turn);
    if let Some(dice) = snapshot.pending_dice {
        println!("pending dice total: {}", dice.total());
    }
    if let Some(lock) = snapshot.advantage_lock {
        let state = if lock.unlocked { "unlocked" } else { "locked" };
        println!("advantage: {} on square {} ({state})", lock.holder, lock.square);
    }
    if !snapshot.queued_rolls.is_empty() {
        println!("queued rolls: {}", snapshot.queued_rolls.len());
    }

    // Prove the save is resumable, not just parseable.
    let restored = snapshot.restore().context("snapshot cannot be resumed")?;
    if restored.round.is_over() {
        match restored.round.winner() {
            Some(winner) => println!("round finished; won by {winner}"),
            None => println!("round finished"),
        }
    } else {
        println!("round in progress; {} to act", restored.round.current_player());
    }
    Ok(())
}
