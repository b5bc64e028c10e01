use super::view::AsOfView;
use super::RiskReading;
use crate::core::time::score;
use crate::core::{MemberId, ModuleTag};
use crate::heuristics::lifecycle::is_diverged;
use crate::heuristics::{classify_files, substantive_modules};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DIVERGED_BRANCH_WEIGHT: f64 = 12.0;
pub const SINGLE_OWNER_WEIGHT: f64 = 40.0;
pub const CROSS_MODULE_WEIGHT: f64 = 3.0;
pub const CROSS_MODULE_CAP: f64 = 20.0;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationFactors {
    pub diverged_branches: usize,
    pub single_owner_modules: Vec<ModuleTag>,
    pub total_modules: usize,
    pub cross_module_commits: usize,
}

/// Per-module commit counts by author, counting each commit once for
/// every module it touches.
pub fn module_ownership<'c>(
    commits: impl IntoIterator<Item = &'c crate::core::Commit>,
) -> BTreeMap<ModuleTag, BTreeMap<MemberId, usize>> {
    let mut ownership: BTreeMap<ModuleTag, BTreeMap<MemberId, usize>> = BTreeMap::new();
    for commit in commits {
        for module in classify_files(&commit.files) {
            *ownership
                .entry(module)
                .or_default()
                .entry(commit.author.clone())
                .or_insert(0) += 1;
        }
    }
    ownership
}

/// Modules where one contributor made more than `share` of the commits.
pub fn single_owner_modules(
    ownership: &BTreeMap<ModuleTag, BTreeMap<MemberId, usize>>,
    share: f64,
) -> Vec<ModuleTag> {
    ownership
        .iter()
        .filter(|(_, authors)| {
            let total: usize = authors.values().sum();
            let top = authors.values().copied().max().unwrap_or(0);
            total > 0 && top as f64 / total as f64 > share
        })
        .map(|(module, _)| *module)
        .collect()
}

pub fn integration_risk(view: &AsOfView<'_>) -> RiskReading<IntegrationFactors> {
    let settings = view.settings;

    let diverged_branches = view
        .branches()
        .into_iter()
        .filter(|(branch, status)| is_diverged(branch, *status, settings))
        .count();

    let ownership = module_ownership(view.commits().iter().copied());
    let single_owner = single_owner_modules(&ownership, settings.thresholds.single_owner_share);
    let total_modules = ownership.len();

    let cross_module_commits = view
        .commits()
        .iter()
        .filter(|c| substantive_modules(&c.files).len() > 1)
        .count();

    let ownership_term = if total_modules > 0 {
        single_owner.len() as f64 / total_modules as f64 * SINGLE_OWNER_WEIGHT
    } else {
        0.0
    };
    let cross_term = (cross_module_commits as f64 * CROSS_MODULE_WEIGHT).min(CROSS_MODULE_CAP);
    let raw = diverged_branches as f64 * DIVERGED_BRANCH_WEIGHT + ownership_term + cross_term;

    RiskReading {
        score: score(raw),
        factors: IntegrationFactors {
            diverged_branches,
            single_owner_modules: single_owner,
            total_modules,
            cross_module_commits,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::core::{Branch, BranchStatus, Commit, Snapshot};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn commit(author: &str, files: &[&str]) -> Commit {
        Commit {
            id: format!("{author}-{}", files.join(",")),
            author: author.to_string(),
            message: "feat: wire profile page to api".to_string(),
            date: now() - Duration::days(1),
            files: files.iter().map(|f| f.to_string()).collect(),
            additions: 5,
            deletions: 0,
            module: crate::heuristics::primary_module(
                &files.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
            ),
            flagged: false,
            honesty_suggestion: None,
        }
    }

    fn branch(name: &str, days_ago: i64, behind: u32) -> Branch {
        Branch {
            name: name.to_string(),
            last_commit: now() - Duration::days(days_ago),
            author: "ana".to_string(),
            status: BranchStatus::Active,
            ahead: 1,
            behind,
            stale_days: None,
        }
    }

    #[test]
    fn test_single_owner_backend() {
        let snapshot = Snapshot {
            commits: vec![
                commit("ana", &["server/routes/a.js"]),
                commit("ana", &["server/routes/b.js"]),
            ],
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = integration_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.factors.single_owner_modules, vec![ModuleTag::Backend]);
        assert_eq!(reading.factors.total_modules, 1);
        assert_eq!(reading.score, 40);
    }

    #[test]
    fn test_shared_module_is_not_single_owner() {
        let ownership = module_ownership(&[
            commit("ana", &["client/App.jsx"]),
            commit("ben", &["client/pages/home.jsx"]),
        ]);
        assert!(single_owner_modules(&ownership, 0.8).is_empty());
    }

    #[test]
    fn test_exactly_eighty_percent_is_not_single_owner() {
        let commits: Vec<Commit> = (0..4)
            .map(|_| commit("ana", &["client/App.jsx"]))
            .chain(std::iter::once(commit("ben", &["client/App.jsx"])))
            .collect();
        let ownership = module_ownership(&commits);
        assert!(single_owner_modules(&ownership, 0.8).is_empty());
    }

    #[test]
    fn test_cross_module_commits_capped() {
        let commits: Vec<Commit> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    commit("ana", &["client/App.jsx", "server/routes/a.js"])
                } else {
                    commit("ben", &["client/App.jsx", "server/routes/a.js"])
                }
            })
            .collect();
        let snapshot = Snapshot {
            commits,
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = integration_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.factors.cross_module_commits, 10);
        // 0 single-owner modules, cross-module term capped at 20
        assert_eq!(reading.score, 20);
    }

    #[test]
    fn test_setup_files_do_not_make_a_commit_cross_module() {
        let snapshot = Snapshot {
            commits: vec![commit("ana", &["client/App.jsx", "README.md"])],
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = integration_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.factors.cross_module_commits, 0);
    }

    #[test]
    fn test_diverged_branches_counted() {
        let snapshot = Snapshot {
            branches: vec![
                branch("main", 30, 50),
                branch("feature/behind", 1, 8),
                branch("feature/stale", 9, 0),
                branch("feature/fresh", 1, 0),
            ],
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = integration_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.factors.diverged_branches, 2);
        assert_eq!(reading.score, 24);
    }
}
