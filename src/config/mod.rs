//! Configuration for repopulse.
//!
//! Settings come from `.repopulse.toml`, discovered in the working directory
//! or any of its ancestors. Every section is optional; missing sections and
//! fields resolve to the defaults the health formulas were calibrated with.

mod core;
mod loader;
mod thresholds;

pub use self::core::{OutputConfig, RepoPulseConfig, Settings};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use thresholds::{BranchConfig, HealthWeights, ThresholdsConfig};

/// Template written by `repopulse init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# repopulse configuration

[thresholds]
inactive_days = 5.0
active_days = 2.0
stagnant_pr_days = 3
critical_pr_age_days = 7
stale_branch_days = 7
abandoned_branch_days = 14
diverged_behind = 5
large_commit_files = 5
single_owner_share = 0.8
deadline_window_hours = 24

[weights]
delivery = 0.45
integration = 0.30
stability = 0.25

[branches]
main_branches = ["main", "master"]

[output]
default_format = "terminal"
"#;
