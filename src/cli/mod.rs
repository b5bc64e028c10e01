//! CLI module for repopulse
//!
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Run environment resolution (`setup`)

pub mod args;
pub mod commands;
pub mod setup;

pub use args::{Cli, Commands, FormatArg};
pub use commands::{handle_init_command, handle_report_command};
pub use setup::{resolve_config, resolve_format, should_use_color, Session};

use crate::observability::{set_current_command, set_phase, PipelinePhase};
use anyhow::Result;

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let _command = set_current_command(cli.command.name());

    if let Commands::Init { force } = cli.command {
        return handle_init_command(&std::env::current_dir()?, force);
    }

    let session = {
        let _phase = set_phase(PipelinePhase::Configuration);
        Session::from_cli(&cli)?
    };
    handle_report_command(&cli.command, &session)
}
