//! Simulation projector
//!
//! Combines a scenario's static impact with the current health reading.
//! Output text comes from fixed templates chosen by what the scenario is
//! about (a member, a pull request, or the whole team) and whether it
//! lowers health (a risk) or raises it (an opportunity).

use crate::core::time::clamp_round;
use crate::core::ModuleTag;
use crate::derived::{DerivedSnapshot, RiskChange, SimulationScenario};
use crate::errors::{Error, Result};
use crate::metrics::HealthScore;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub scenario_id: String,
    pub scenario_name: String,
    pub current_health: u32,
    pub projected_health: u32,
    pub health_change: i32,
    pub risk_change: RiskChange,
    pub new_blockers: i32,
    pub affected_modules: Vec<ModuleTag>,
    pub analysis: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Subject<'a> {
    Member(&'a str),
    PullRequest(&'a str),
    Team,
}

impl<'a> Subject<'a> {
    fn of(scenario: &'a SimulationScenario) -> Self {
        match (&scenario.member_id, &scenario.pr_id) {
            (Some(member), _) => Subject::Member(member),
            (None, Some(pr)) => Subject::PullRequest(pr),
            (None, None) => Subject::Team,
        }
    }
}

fn module_list(modules: &[ModuleTag]) -> Option<String> {
    if modules.is_empty() {
        return None;
    }
    Some(
        modules
            .iter()
            .map(ModuleTag::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn plural(count: i32, one: &str, many: &str) -> String {
    if count.abs() == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

fn analysis_for(
    scenario: &SimulationScenario,
    subject: Subject<'_>,
    current: u32,
    projected: u32,
) -> Vec<String> {
    let impact = &scenario.impact;
    let risk = impact.health_drop < 0;
    let change = projected as i32 - current as i32;

    let headline = match (subject, risk) {
        (Subject::Member(member), true) => format!(
            "If {member} stays inactive for another {}h, project health falls from {current} to {projected} ({change:+}).",
            scenario.delay_hours
        ),
        (Subject::PullRequest(pr), true) => format!(
            "If PR #{pr} waits another {}h, project health falls from {current} to {projected} ({change:+}).",
            scenario.delay_hours
        ),
        (Subject::Team, true) => format!(
            "This scenario lowers project health from {current} to {projected} ({change:+})."
        ),
        (Subject::Member(member), false) => format!(
            "With {member} back on track, project health moves from {current} to {projected} ({change:+})."
        ),
        (Subject::PullRequest(pr), false) => format!(
            "Merging PR #{pr} moves project health from {current} to {projected} ({change:+})."
        ),
        (Subject::Team, false) => format!(
            "Clearing all open work moves project health from {current} to {projected} ({change:+})."
        ),
    };

    let mut analysis = vec![
        headline,
        format!(
            "Delivery risk changes by {:+} and integration risk by {:+}.",
            impact.risk_change.delivery_risk, impact.risk_change.integration_risk
        ),
    ];

    if let Some(modules) = module_list(&impact.affected_modules) {
        let verb = if risk { "Modules exposed" } else { "Modules that benefit" };
        analysis.push(format!("{verb}: {modules}."));
    }

    match impact.new_blockers {
        0 => {}
        n if n > 0 => analysis.push(format!("Expect {} more.", plural(n, "blocker", "blockers"))),
        n => analysis.push(format!("Clears {}.", plural(-n, "blocker", "blockers"))),
    }

    analysis
}

fn recommendations_for(scenario: &SimulationScenario, subject: Subject<'_>) -> Vec<String> {
    let risk = scenario.impact.health_drop < 0;
    let modules = module_list(&scenario.impact.affected_modules);

    match (subject, risk) {
        (Subject::Member(member), true) => vec![
            format!("Check in with {member} about what is blocking them."),
            match modules {
                Some(modules) => format!("Pair a second contributor on {modules} so work can continue."),
                None => "Pair a second contributor on their open work so it can continue.".to_string(),
            },
            format!("Reassign {member}'s open pull requests if they cannot return soon."),
        ],
        (Subject::PullRequest(pr), true) => vec![
            format!("Assign a reviewer to PR #{pr} today."),
            "Rebase the branch onto main before it drifts further.".to_string(),
            "Split the change if it is too large to review in one sitting.".to_string(),
        ],
        (Subject::Team, true) => vec![
            "Review the blocker list and pick an owner for each critical item.".to_string(),
            "Hold a short sync to rebalance work across the team.".to_string(),
        ],
        (Subject::Member(member), false) => vec![
            format!("Keep {member}'s current tasks small so progress stays visible."),
        ],
        (Subject::PullRequest(pr), false) => vec![
            format!("Prioritize the review of PR #{pr}."),
            "Delete the branch after merging to keep the branch list clean.".to_string(),
        ],
        (Subject::Team, false) => vec![
            "Schedule a review session to work through the open pull requests.".to_string(),
            "Merge small, reviewed changes daily to keep integration risk low.".to_string(),
        ],
    }
}

/// Project `scenario` onto the current health reading.
pub fn project(scenario: &SimulationScenario, current: &HealthScore) -> ProjectionResult {
    let current_health = current.overall;
    let projected_health =
        clamp_round(current_health as f64 + scenario.impact.health_drop as f64, 0, 100) as u32;
    let subject = Subject::of(scenario);

    ProjectionResult {
        scenario_id: scenario.id.clone(),
        scenario_name: scenario.name.clone(),
        current_health,
        projected_health,
        health_change: projected_health as i32 - current_health as i32,
        risk_change: scenario.impact.risk_change,
        new_blockers: scenario.impact.new_blockers,
        affected_modules: scenario.impact.affected_modules.clone(),
        analysis: analysis_for(scenario, subject, current_health, projected_health),
        recommendations: recommendations_for(scenario, subject),
    }
}

/// Look a scenario up by id and project it.
pub fn find_and_project(
    derived: &DerivedSnapshot,
    scenario_id: &str,
    current: &HealthScore,
) -> Result<ProjectionResult> {
    let scenario = derived
        .scenario(scenario_id)
        .ok_or_else(|| Error::ScenarioNotFound(scenario_id.to_string()))?;
    debug!(scenario = scenario_id, "projecting scenario");
    Ok(project(scenario, current))
}
