use crate::core::time::clamp_round;
use crate::core::{Commit, ModuleTag};
use crate::heuristics::classify_files;
use crate::metrics::integration::module_ownership;
use crate::metrics::AsOfView;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationStatus {
    Integrated,
    Partial,
    AtRisk,
    Isolated,
}

impl IntegrationStatus {
    pub fn from_risk(risk: u32) -> Self {
        match risk {
            r if r > 70 => Self::Isolated,
            r if r > 50 => Self::AtRisk,
            r if r > 20 => Self::Partial,
            _ => Self::Integrated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integrated => "integrated",
            Self::Partial => "partial",
            Self::AtRisk => "at-risk",
            Self::Isolated => "isolated",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationRisk {
    pub module: ModuleTag,
    pub risk: u32,
    pub status: IntegrationStatus,
    pub dependencies: Vec<ModuleTag>,
}

/// Other modules touched by the same commits as each module.
fn co_touched_modules(commits: &[&Commit]) -> BTreeMap<ModuleTag, BTreeSet<ModuleTag>> {
    let mut deps: BTreeMap<ModuleTag, BTreeSet<ModuleTag>> = BTreeMap::new();
    for commit in commits {
        let modules = classify_files(&commit.files);
        for module in &modules {
            deps.entry(*module)
                .or_default()
                .extend(modules.iter().filter(|other| *other != module));
        }
    }
    deps
}

pub fn module_risk(owners: usize, team_size: usize) -> u32 {
    let team_size = team_size.max(1) as f64;
    let shared_penalty = if owners > 1 { 20.0 } else { 0.0 };
    clamp_round(100.0 - owners as f64 / team_size * 50.0 - shared_penalty, 5, 95) as u32
}

/// Riskiest module first, ties broken by module name. Only commits visible
/// at the view's cutoff count.
pub fn integration_risks(view: &AsOfView<'_>) -> Vec<IntegrationRisk> {
    let ownership = module_ownership(view.commits().iter().copied());
    let mut deps = co_touched_modules(view.commits());

    let team_size = match view.snapshot.team_size() {
        0 => view.contributor_ids().len(),
        n => n,
    };

    let mut risks: Vec<IntegrationRisk> = ownership
        .into_iter()
        .map(|(module, authors)| {
            let risk = module_risk(authors.len(), team_size);
            IntegrationRisk {
                module,
                risk,
                status: IntegrationStatus::from_risk(risk),
                dependencies: deps.remove(&module).unwrap_or_default().into_iter().collect(),
            }
        })
        .collect();

    risks.sort_by(|a, b| b.risk.cmp(&a.risk).then_with(|| a.module.cmp(&b.module)));
    risks
}
