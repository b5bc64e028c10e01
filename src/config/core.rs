use serde::{Deserialize, Serialize};

use super::thresholds::{BranchConfig, HealthWeights, ThresholdsConfig};

/// Root configuration structure for repopulse (`.repopulse.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepoPulseConfig {
    /// Recency and size thresholds
    #[serde(default)]
    pub thresholds: Option<ThresholdsConfig>,

    /// Health score component weights
    #[serde(default)]
    pub weights: Option<HealthWeights>,

    /// Branch naming conventions
    #[serde(default)]
    pub branches: Option<BranchConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

impl RepoPulseConfig {
    /// Resolve every optional section into the settings the engine runs with.
    pub fn settings(&self) -> Settings {
        Settings {
            thresholds: self.thresholds.clone().unwrap_or_default(),
            weights: self.weights.clone().unwrap_or_default(),
            main_branches: self
                .branches
                .clone()
                .unwrap_or_default()
                .main_branches,
        }
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output
            .as_ref()
            .and_then(|o| o.default_format.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub default_format: Option<String>,
    /// Enable colored output (default: auto-detect based on TTY)
    #[serde(default)]
    pub use_color: Option<bool>,
}

/// Fully resolved settings passed by reference into every derivation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub thresholds: ThresholdsConfig,
    pub weights: HealthWeights,
    pub main_branches: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        RepoPulseConfig::default().settings()
    }
}

impl Settings {
    pub fn is_main_branch(&self, name: &str) -> bool {
        self.main_branches.iter().any(|b| b == name)
    }
}
