pub mod output;

pub use output::{create_writer, Document, JsonWriter, OutputFormat, OutputWriter, TerminalWriter};

use crate::config::Settings;
use crate::core::Snapshot;
use crate::ingest::parse_snapshot_json;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read a raw snapshot JSON file and normalize it as of `now`.
pub fn read_snapshot(path: &Path, now: DateTime<Utc>, settings: &Settings) -> Result<Snapshot> {
    let contents = read_file(path)?;
    parse_snapshot_json(&contents, now, settings)
        .with_context(|| format!("Invalid snapshot {}", path.display()))
}
