use clap::{Parser, Subcommand};

use self::{config::ConfigArg, scenario::ScenarioArg, train::TrainArg};

mod config;
mod scenario;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve parking controllers with the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Print the default scenario, or check a scenario file
    Scenario(#[clap(flatten)] ScenarioArg),
    /// Print the default training configuration as TOML
    Config(#[clap(flatten)] ConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Train(TrainArg::default())) {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Scenario(arg) => scenario::run(&arg)?,
        Mode::Config(arg) => config::run(&arg)?,
    }
    Ok(())
}
