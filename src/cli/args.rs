use crate::ingest::parse_timestamp;
use crate::io::OutputFormat;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Pretty-printed JSON, the same documents the dashboard API serves
    Json,
    /// Tables for humans
    Terminal,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Terminal => OutputFormat::Terminal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "repopulse")]
#[command(about = "Repository health analytics for small-team GitHub projects", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Raw snapshot JSON to analyze
    #[arg(long, global = true, env = "REPOPULSE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Output format (defaults to the config file, then terminal)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<FormatArg>,

    /// Pin the clock (RFC 3339) for reproducible output
    #[arg(long, global = true, value_parser = parse_now)]
    pub now: Option<DateTime<Utc>>,

    /// Explicit config file instead of discovering .repopulse.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colors in terminal output
    #[arg(long, global = true)]
    pub plain: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Health score with breakdown, daily trend, velocity and contributions
    Health,
    /// Detected blockers in priority order
    Blockers,
    /// Per-module integration risk
    Integration,
    /// Commit counts per module and contributor
    BusFactor,
    /// Generated what-if scenarios
    Simulation,
    /// Commit message honesty verdicts
    Honesty,
    /// Members who stopped committing
    Ghosting,
    /// Per-member activity status
    Activity,
    /// Project one scenario onto the current health score
    Simulate {
        /// Scenario id, as listed by `repopulse simulation`
        scenario_id: String,
    },
    /// Write a default .repopulse.toml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Blockers => "blockers",
            Self::Integration => "integration",
            Self::BusFactor => "bus-factor",
            Self::Simulation => "simulation",
            Self::Honesty => "honesty",
            Self::Ghosting => "ghosting",
            Self::Activity => "activity",
            Self::Simulate { .. } => "simulate",
            Self::Init { .. } => "init",
        }
    }
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(value).ok_or_else(|| format!("invalid RFC 3339 timestamp: {value}"))
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
