//! Derived-entity builder
//!
//! One consistent pass over a [`Snapshot`] that produces everything the
//! dashboard shows besides the live metrics: blockers, ghosting alerts,
//! member activity, per-module integration risk, the bus-factor matrix,
//! contribution stats, simulation scenarios and the commit-honesty listing.
//!
//! The result is a point-in-time document. The live metrics engine never
//! reads it back.

pub mod activity;
pub mod blockers;
pub mod bus_factor;
pub mod ghosting;
pub mod honesty;
pub mod integration;
pub mod scenarios;

pub use activity::{ActivityStatus, MemberActivity};
pub use blockers::{Blocker, BlockerType, Severity};
pub use bus_factor::BusFactor;
pub use ghosting::GhostingAlert;
pub use honesty::CommitHonesty;
pub use integration::{IntegrationRisk, IntegrationStatus};
pub use scenarios::{RiskChange, ScenarioImpact, SimulationScenario};

use crate::config::Settings;
use crate::core::Snapshot;
use crate::metrics::{AsOfView, ContributionStat, HealthScore, MetricsEngine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Health score the scenario impacts were computed against
    pub health: HealthScore,
    pub blockers: Vec<Blocker>,
    pub ghosting: Vec<GhostingAlert>,
    pub activity: Vec<MemberActivity>,
    pub integration: Vec<IntegrationRisk>,
    pub bus_factor: BusFactor,
    pub contributions: Vec<ContributionStat>,
    pub scenarios: Vec<SimulationScenario>,
    pub honesty: Vec<CommitHonesty>,
}

impl DerivedSnapshot {
    pub fn scenario(&self, id: &str) -> Option<&SimulationScenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }
}

pub fn build_derived(snapshot: &Snapshot, now: DateTime<Utc>, settings: &Settings) -> DerivedSnapshot {
    let _span = info_span!("derive", commits = snapshot.commits.len()).entered();

    let engine = MetricsEngine::new(snapshot, settings, now);
    let view = AsOfView::new(snapshot, settings, now);
    let health = engine.health_score();

    let derived = DerivedSnapshot {
        generated_at: now,
        health,
        blockers: blockers::detect_blockers(&view),
        ghosting: ghosting::ghosting_alerts(&view),
        activity: activity::member_activity(&view),
        integration: integration::integration_risks(&view),
        bus_factor: bus_factor::bus_factor(&view),
        contributions: engine.contributions(),
        scenarios: scenarios::generate_scenarios(&view, &health),
        honesty: honesty::honesty_listing(snapshot),
    };

    debug!(
        blockers = derived.blockers.len(),
        ghosting = derived.ghosting.len(),
        scenarios = derived.scenarios.len(),
        "derived snapshot built"
    );

    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Commit, ModuleTag};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_build_is_deterministic() {
        let now = Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap();
        let snapshot = Snapshot {
            commits: vec![Commit {
                id: "c1".to_string(),
                author: "ana".to_string(),
                message: "wip".to_string(),
                date: now - Duration::days(6),
                files: vec!["server/routes/users.js".to_string()],
                additions: 40,
                deletions: 3,
                module: ModuleTag::Backend,
                flagged: true,
                honesty_suggestion: None,
            }],
            ..Default::default()
        };
        let settings = Settings::default();
        let first = build_derived(&snapshot, now, &settings);
        let second = build_derived(&snapshot, now, &settings);
        assert_eq!(first, second);
        assert_eq!(first.health, MetricsEngine::new(&snapshot, &settings, now).health_score());
        assert!(first.scenario("sim-inactive-ana").is_some());
        assert!(first.scenario("sim-missing").is_none());
    }
}
