// Command-line surface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "scoutpro",
    about = "Project NBA outcome tiers and historical comps for college prospects",
    version
)]
pub struct Cli {
    /// Mirror log output to stderr as well as logs/scoutpro.log
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scout report for every prospect in a TOML or JSON file
    Evaluate(EvaluateArgs),
    /// Project the same prospects under several scoring profiles
    Compare(CompareArgs),
    /// Leave-one-year-out backtest over the historical database
    Backtest(BacktestArgs),
    /// List the configured scoring profiles
    Profiles,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Prospect file (.toml or .json)
    pub file: PathBuf,
    /// Scoring profile (defaults to [scoring].default_profile)
    #[arg(long)]
    pub profile: Option<String>,
    /// Comps to list per prospect
    #[arg(long)]
    pub top: Option<usize>,
    /// Emit JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Prospect file (.toml or .json)
    pub file: PathBuf,
    /// Comma-separated profile names
    #[arg(long, value_delimiter = ',', required = true)]
    pub profiles: Vec<String>,
    /// Comps considered per prospect
    #[arg(long)]
    pub top: Option<usize>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Comma-separated profile names (defaults to the default profile)
    #[arg(long, value_delimiter = ',')]
    pub profiles: Vec<String>,
    /// First held-out draft year
    #[arg(long = "from")]
    pub from: Option<u16>,
    /// Last held-out draft year
    #[arg(long = "to")]
    pub to: Option<u16>,
    #[arg(long)]
    pub json: bool,
}
