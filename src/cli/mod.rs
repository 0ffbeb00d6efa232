use clap::Parser;
use std::path::PathBuf;

use crate::scenarios::Scenario;

#[derive(Parser, Debug)]
#[command(name = "vota")]
#[command(about = "🗳️  vota - chat agent with a voting contract to talk about")]
#[command(long_about = "Deploys a throwaway voting contract to a local test chain and runs scripted \
    conversations with a tool-calling agent")]
#[command(version)]
pub struct Args {
    /// debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// weather example
    #[arg(short, long)]
    pub weather: bool,

    /// multi-turn
    #[arg(short, long)]
    pub memory: bool,

    /// custom tool
    #[arg(short, long)]
    pub custom: bool,

    /// Config file (defaults to the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Selected scenarios, in the order they run.
    pub fn scenarios(&self) -> Vec<Scenario> {
        [
            (self.weather, Scenario::Weather),
            (self.memory, Scenario::Memory),
            (self.custom, Scenario::Custom),
        ]
        .into_iter()
        .filter_map(|(selected, scenario)| selected.then_some(scenario))
        .collect()
    }
}
