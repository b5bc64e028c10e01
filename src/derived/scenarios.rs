//! What-if scenarios generated from the current state of the repository.
//!
//! Each scenario carries a static impact: raw risk deltas clamped so the
//! current breakdown plus the delta stays within 0-100, and the health
//! change those deltas imply under the configured weights. Impacts are
//! computed against the health score of the same derivation pass.

use super::blockers::author_modules;
use crate::config::HealthWeights;
use crate::core::time::round_half_away;
use crate::core::{MemberId, ModuleTag, PullRequest};
use crate::heuristics::lifecycle::{is_diverged, is_stagnant_at};
use crate::metrics::integration::module_ownership;
use crate::metrics::{AsOfView, HealthScore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MAX_STALE_PR_SCENARIOS: usize = 2;
pub const MAX_INACTIVE_MEMBER_SCENARIOS: usize = 2;

const STALE_PR_DELAY_HOURS: u32 = 48;
const INACTIVE_MEMBER_DELAY_HOURS: u32 = 72;
const OWNED_MODULE_INTEGRATION_DELTA: i32 = 10;
const OWNED_MODULE_INTEGRATION_CAP: i32 = 30;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskChange {
    pub delivery_risk: i32,
    pub integration_risk: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioImpact {
    pub health_drop: i32,
    pub new_blockers: i32,
    pub affected_modules: Vec<ModuleTag>,
    pub risk_change: RiskChange,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_id: Option<String>,
    pub delay_hours: u32,
    pub impact: ScenarioImpact,
}

/// Clamps raw deltas against the current breakdown and derives the health
/// change they imply.
struct ImpactModel<'a> {
    current: &'a HealthScore,
    weights: &'a HealthWeights,
}

impl ImpactModel<'_> {
    fn clamp_delta(current: u32, delta: i32) -> i32 {
        let current = current as i32;
        (current + delta).clamp(0, 100) - current
    }

    fn impact(
        &self,
        delivery_delta: i32,
        integration_delta: i32,
        new_blockers: i32,
        affected_modules: Vec<ModuleTag>,
    ) -> ScenarioImpact {
        let breakdown = &self.current.breakdown;
        let risk_change = RiskChange {
            delivery_risk: Self::clamp_delta(breakdown.delivery_risk, delivery_delta),
            integration_risk: Self::clamp_delta(breakdown.integration_risk, integration_delta),
        };
        let weighted = risk_change.delivery_risk as f64 * self.weights.delivery
            + risk_change.integration_risk as f64 * self.weights.integration;
        ScenarioImpact {
            health_drop: round_half_away(-weighted) as i32,
            new_blockers,
            affected_modules,
            risk_change,
        }
    }
}

fn oldest_first<'a>(prs: impl Iterator<Item = &'a PullRequest>) -> Vec<&'a PullRequest> {
    let mut prs: Vec<&PullRequest> = prs.collect();
    prs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    prs
}

/// Modules where `author` has the most commits. Tied authors all count.
fn top_owned_modules(view: &AsOfView<'_>, author: &str) -> Vec<ModuleTag> {
    module_ownership(view.commits().iter().copied())
        .into_iter()
        .filter(|(_, authors)| {
            let top = authors.values().copied().max().unwrap_or(0);
            authors.get(author).is_some_and(|count| *count == top && top > 0)
        })
        .map(|(module, _)| module)
        .collect()
}

fn stale_pr_scenarios(view: &AsOfView<'_>, model: &ImpactModel<'_>) -> Vec<SimulationScenario> {
    oldest_first(view.stagnant_pull_requests())
        .into_iter()
        .take(MAX_STALE_PR_SCENARIOS)
        .map(|pr| SimulationScenario {
            id: format!("sim-stale-pr-{}", pr.id),
            name: format!("PR #{} delayed another {}h", pr.id, STALE_PR_DELAY_HOURS),
            description: format!(
                "\"{}\" stays unreviewed for {} more hours while {} keeps drifting from main.",
                pr.title, STALE_PR_DELAY_HOURS, pr.branch
            ),
            member_id: None,
            pr_id: Some(pr.id.clone()),
            delay_hours: STALE_PR_DELAY_HOURS,
            impact: model.impact(15, 12, 1, author_modules(view.snapshot, &pr.author)),
        })
        .collect()
}

fn inactive_member_scenarios(
    view: &AsOfView<'_>,
    model: &ImpactModel<'_>,
) -> Vec<SimulationScenario> {
    let last_commits = view.last_commit_by_author();
    let mut inactive = view.inactive_contributors();
    inactive.sort_by(|a, b| {
        last_commits
            .get(a.as_str())
            .cmp(&last_commits.get(b.as_str()))
            .then_with(|| a.cmp(b))
    });

    inactive
        .into_iter()
        .take(MAX_INACTIVE_MEMBER_SCENARIOS)
        .map(|id| {
            let name = view.snapshot.display_name(&id);
            let owned = top_owned_modules(view, &id);
            let integration_delta = (owned.len() as i32 * OWNED_MODULE_INTEGRATION_DELTA)
                .min(OWNED_MODULE_INTEGRATION_CAP);
            let open_prs = view.open_pull_requests().filter(|pr| pr.author == id).count() as i32;
            let affected = if owned.is_empty() {
                author_modules(view.snapshot, &id)
            } else {
                owned
            };
            SimulationScenario {
                id: format!("sim-inactive-{id}"),
                name: format!("{name} stays inactive for {INACTIVE_MEMBER_DELAY_HOURS}h"),
                description: format!(
                    "{name} does not commit for another {INACTIVE_MEMBER_DELAY_HOURS} hours and their open work stalls."
                ),
                member_id: Some(id),
                pr_id: None,
                delay_hours: INACTIVE_MEMBER_DELAY_HOURS,
                impact: model.impact(18, integration_delta, 1 + open_prs, affected),
            }
        })
        .collect()
}

fn merge_oldest_scenario(
    view: &AsOfView<'_>,
    model: &ImpactModel<'_>,
) -> Option<SimulationScenario> {
    let pr = oldest_first(view.open_pull_requests()).into_iter().next()?;

    let stagnant = is_stagnant_at(pr, view.cutoff, &view.settings.thresholds);
    let diverged = view
        .branches()
        .into_iter()
        .any(|(branch, status)| branch.name == pr.branch && is_diverged(branch, status, view.settings));

    let delivery_delta = if stagnant { -15 } else { -8 };
    let integration_delta = if diverged { -12 } else { -5 };

    Some(SimulationScenario {
        id: format!("sim-merge-pr-{}", pr.id),
        name: format!("Merge PR #{} today", pr.id),
        description: format!(
            "\"{}\" is reviewed and merged today, bringing {} back in line with main.",
            pr.title, pr.branch
        ),
        member_id: None,
        pr_id: Some(pr.id.clone()),
        delay_hours: 0,
        impact: model.impact(
            delivery_delta,
            integration_delta,
            -1,
            author_modules(view.snapshot, &pr.author),
        ),
    })
}

fn all_merged_scenario(view: &AsOfView<'_>, model: &ImpactModel<'_>) -> SimulationScenario {
    let breakdown = &model.current.breakdown;
    let affected: BTreeSet<ModuleTag> = view.modules().into_iter().filter(|m| !m.is_trivial()).collect();
    SimulationScenario {
        id: "sim-all-merged".to_string(),
        name: "All open work merged".to_string(),
        description: "Every open branch is reviewed and merged, leaving nothing in flight.".to_string(),
        member_id: None,
        pr_id: None,
        delay_hours: 0,
        impact: model.impact(
            -(breakdown.delivery_risk as i32),
            -(round_half_away(breakdown.integration_risk as f64 / 2.0) as i32),
            0,
            affected.into_iter().collect(),
        ),
    }
}

pub fn generate_scenarios(view: &AsOfView<'_>, current: &HealthScore) -> Vec<SimulationScenario> {
    let model = ImpactModel {
        current,
        weights: &view.settings.weights,
    };

    let mut scenarios = stale_pr_scenarios(view, &model);
    scenarios.extend(inactive_member_scenarios(view, &model));
    scenarios.extend(merge_oldest_scenario(view, &model));

    if scenarios.is_empty() {
        scenarios.push(all_merged_scenario(view, &model));
    }
    scenarios
}
