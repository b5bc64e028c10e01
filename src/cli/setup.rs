//! Resolution of the run environment: config, clock, output format, colors.

use super::args::{Cli, FormatArg};
use crate::config::{load_config, load_config_from, RepoPulseConfig, Settings};
use crate::io::OutputFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Everything a report command needs besides the snapshot itself.
#[derive(Debug, Clone)]
pub struct Session {
    pub snapshot_path: Option<PathBuf>,
    pub settings: Settings,
    pub now: DateTime<Utc>,
    pub format: OutputFormat,
    pub use_color: bool,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = resolve_config(cli.config.as_deref())?;
        Ok(Self {
            snapshot_path: cli.snapshot.clone(),
            settings: config.settings(),
            now: cli.now.unwrap_or_else(Utc::now),
            format: resolve_format(cli.format, &config),
            use_color: should_use_color(cli.plain, config.output.as_ref().and_then(|o| o.use_color)),
        })
    }

    pub fn snapshot_path(&self) -> Result<&Path> {
        self.snapshot_path
            .as_deref()
            .context("No snapshot given. Pass --snapshot <path> or set REPOPULSE_SNAPSHOT.")
    }
}

/// An explicit `--config` must load; a discovered one falls back to defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<RepoPulseConfig> {
    match explicit {
        Some(path) => load_config_from(path).map_err(anyhow::Error::msg),
        None => Ok(load_config()),
    }
}

pub fn resolve_format(arg: Option<FormatArg>, config: &RepoPulseConfig) -> OutputFormat {
    arg.map(OutputFormat::from)
        .or_else(|| config.default_format().and_then(OutputFormat::from_config))
        .unwrap_or(OutputFormat::Terminal)
}

/// `--plain` wins, then the config's `use_color`, then TTY detection.
pub fn should_use_color(plain: bool, configured: Option<bool>) -> bool {
    if plain {
        return false;
    }
    configured.unwrap_or_else(|| {
        std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
    })
}
