use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::RepoPulseConfig;
use super::thresholds::{HealthWeights, ThresholdsConfig};

pub const CONFIG_FILE_NAME: &str = ".repopulse.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string.
///
/// Invalid sections are replaced with their defaults (with a warning)
/// rather than rejecting the whole file.
pub fn parse_and_validate_config(contents: &str) -> Result<RepoPulseConfig, String> {
    let mut config = toml::from_str::<RepoPulseConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if let Some(ref weights) = config.weights {
        if let Err(e) = weights.validate() {
            log::warn!("Invalid health weights: {}. Using defaults.", e);
            config.weights = Some(HealthWeights::default());
        }
    }

    if let Some(ref thresholds) = config.thresholds {
        if let Err(e) = thresholds.validate() {
            log::warn!("Invalid thresholds: {}. Using defaults.", e);
            config.thresholds = Some(ThresholdsConfig::default());
        }
    }

    Ok(config)
}

/// Load an explicitly requested config file; errors are surfaced, not defaulted.
pub fn load_config_from(path: &Path) -> Result<RepoPulseConfig, String> {
    let contents = read_config_file(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let config = parse_and_validate_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<RepoPulseConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Only log actual errors, not "file not found"
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.repopulse.toml`.
pub fn discover_config(start: PathBuf) -> RepoPulseConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            RepoPulseConfig::default()
        })
}

pub fn load_config() -> RepoPulseConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            RepoPulseConfig::default()
        }
    }
}
