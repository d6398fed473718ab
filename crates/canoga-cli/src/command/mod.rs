use clap::{Parser, Subcommand};

use self::{inspect::InspectArg, simulate::SimulateArg};

mod inspect;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play an automated match and report the result
    Simulate(SimulateArg),
    /// Read a saved snapshot and describe it
    Inspect(InspectArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match &args.mode {
        Mode::Simulate(arg) => simulate::run(arg),
        Mode::Inspect(arg) => inspect::run(arg),
    }
}
