//! Command handlers for CLI subcommands

mod init;
mod report;

pub use init::handle_init_command;
pub use report::handle_report_command;
