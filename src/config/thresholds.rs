use serde::{Deserialize, Serialize};

/// Recency and size thresholds used by every classification rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Days without a commit before a contributor counts as inactive
    #[serde(default = "default_inactive_days")]
    pub inactive_days: f64,

    /// Days without a commit still considered "currently active"
    #[serde(default = "default_active_days")]
    pub active_days: f64,

    /// Age in days after which an uncommented open PR is stagnant
    #[serde(default = "default_stagnant_pr_days")]
    pub stagnant_pr_days: i64,

    /// Age in whole days after which a stagnant PR blocker is critical
    #[serde(default = "default_critical_pr_age_days")]
    pub critical_pr_age_days: i64,

    #[serde(default = "default_stale_branch_days")]
    pub stale_branch_days: i64,

    #[serde(default = "default_abandoned_branch_days")]
    pub abandoned_branch_days: i64,

    /// Branches this far behind the default branch count as diverged
    #[serde(default = "default_diverged_behind")]
    pub diverged_behind: u32,

    /// Commits touching more files than this are "large"
    #[serde(default = "default_large_commit_files")]
    pub large_commit_files: usize,

    /// Share of a module's commits one contributor must exceed to own it
    #[serde(default = "default_single_owner_share")]
    pub single_owner_share: f64,

    #[serde(default = "default_deadline_window_hours")]
    pub deadline_window_hours: i64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            inactive_days: default_inactive_days(),
            active_days: default_active_days(),
            stagnant_pr_days: default_stagnant_pr_days(),
            critical_pr_age_days: default_critical_pr_age_days(),
            stale_branch_days: default_stale_branch_days(),
            abandoned_branch_days: default_abandoned_branch_days(),
            diverged_behind: default_diverged_behind(),
            large_commit_files: default_large_commit_files(),
            single_owner_share: default_single_owner_share(),
            deadline_window_hours: default_deadline_window_hours(),
        }
    }
}

impl ThresholdsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.inactive_days <= 0.0 {
            return Err("inactive_days must be positive".to_string());
        }
        if self.active_days > self.inactive_days {
            return Err(format!(
                "active_days ({}) must not exceed inactive_days ({})",
                self.active_days, self.inactive_days
            ));
        }
        if self.stale_branch_days > self.abandoned_branch_days {
            return Err(format!(
                "stale_branch_days ({}) must not exceed abandoned_branch_days ({})",
                self.stale_branch_days, self.abandoned_branch_days
            ));
        }
        if !(0.0..=1.0).contains(&self.single_owner_share) {
            return Err("single_owner_share must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

fn default_inactive_days() -> f64 {
    5.0
}
fn default_active_days() -> f64 {
    2.0
}
fn default_stagnant_pr_days() -> i64 {
    3
}
fn default_critical_pr_age_days() -> i64 {
    7
}
fn default_stale_branch_days() -> i64 {
    7
}
fn default_abandoned_branch_days() -> i64 {
    14
}
fn default_diverged_behind() -> u32 {
    5
}
fn default_large_commit_files() -> usize {
    5
}
fn default_single_owner_share() -> f64 {
    0.8
}
fn default_deadline_window_hours() -> i64 {
    24
}

/// Weights of the three risk components in the composite health score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    #[serde(default = "default_delivery_weight")]
    pub delivery: f64,

    #[serde(default = "default_integration_weight")]
    pub integration: f64,

    #[serde(default = "default_stability_weight")]
    pub stability: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            delivery: default_delivery_weight(),
            integration: default_integration_weight(),
            stability: default_stability_weight(),
        }
    }
}

impl HealthWeights {
    // Pure function: Check if a weight is in valid range
    pub fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (weight, name) in [
            (self.delivery, "delivery"),
            (self.integration, "integration"),
            (self.stability, "stability"),
        ] {
            if !Self::is_valid_weight(weight) {
                return Err(format!("{} weight must be between 0.0 and 1.0", name));
            }
        }

        let sum = self.delivery + self.integration + self.stability;
        if (sum - 1.0).abs() > 0.001 {
            return Err(format!(
                "Health weights (delivery, integration, stability) must sum to 1.0, but sum to {:.3}",
                sum
            ));
        }
        Ok(())
    }
}

fn default_delivery_weight() -> f64 {
    0.45
}
fn default_integration_weight() -> f64 {
    0.30
}
fn default_stability_weight() -> f64 {
    0.25
}

/// Branch naming conventions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Branches that never count as diverged
    #[serde(default = "default_main_branches")]
    pub main_branches: Vec<String>,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            main_branches: default_main_branches(),
        }
    }
}

fn default_main_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        assert!(HealthWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = HealthWeights {
            delivery: 0.5,
            integration: 0.5,
            stability: 0.5,
        };
        let err = weights.validate().unwrap_err();
        assert!(err.contains("sum to 1.500"), "{err}");
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let weights = HealthWeights {
            delivery: 1.2,
            integration: -0.1,
            stability: -0.1,
        };
        assert!(weights.validate().unwrap_err().contains("delivery"));
    }

    #[test]
    fn test_threshold_ordering_validated() {
        let thresholds = ThresholdsConfig {
            stale_branch_days: 20,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
        assert!(ThresholdsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_field_defaults() {
        let thresholds: ThresholdsConfig = toml::from_str("inactive_days = 7.0").unwrap();
        assert_eq!(thresholds.inactive_days, 7.0);
        assert_eq!(thresholds.stagnant_pr_days, 3);
        assert_eq!(thresholds.abandoned_branch_days, 14);
    }
}
