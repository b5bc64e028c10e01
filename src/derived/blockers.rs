//! Blocker detection.
//!
//! Blockers are emitted in a fixed priority order: stagnant PRs, inactive
//! members, abandoned branches, then unreviewed PRs. Within each group the
//! order is explicit (oldest PR first, roster order, branch name) so the
//! most prominent blocker never depends on input ordering.

use crate::core::{BranchStatus, MemberId, ModuleTag, PullRequest, Snapshot};
use crate::heuristics::lifecycle::pr_age_days;
use crate::metrics::AsOfView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockerType {
    StalePr,
    InactiveMember,
    AbandonedBranch,
    UnreviewedPr,
}

impl BlockerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StalePr => "stale_pr",
            Self::InactiveMember => "inactive_member",
            Self::AbandonedBranch => "abandoned_branch",
            Self::UnreviewedPr => "unreviewed_pr",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blocker {
    pub id: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: BlockerType,
    pub title: String,
    pub description: String,
    pub affected_modules: Vec<ModuleTag>,
    pub owner: MemberId,
    pub detected_at: DateTime<Utc>,
}

/// Non-setup modules an author has committed to, in module order.
pub fn author_modules(snapshot: &Snapshot, author: &str) -> Vec<ModuleTag> {
    snapshot
        .commits_by(author)
        .map(|c| c.module)
        .filter(|m| !m.is_trivial())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Open PRs visible in the view, oldest first.
fn open_prs_oldest_first<'a>(prs: impl Iterator<Item = &'a PullRequest>) -> Vec<&'a PullRequest> {
    let mut prs: Vec<&PullRequest> = prs.collect();
    prs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    prs
}

fn stale_pr_blockers(view: &AsOfView<'_>) -> Vec<Blocker> {
    let snapshot = view.snapshot;
    let critical_after = view.settings.thresholds.critical_pr_age_days;

    open_prs_oldest_first(view.stagnant_pull_requests())
        .into_iter()
        .map(|pr| {
            let age = pr_age_days(pr, view.cutoff);
            let severity = if age > critical_after {
                Severity::Critical
            } else {
                Severity::High
            };
            Blocker {
                id: format!("blk-stale-pr-{}", pr.id),
                severity,
                kind: BlockerType::StalePr,
                title: format!("PR #{} has had no activity for {} days", pr.id, age),
                description: format!(
                    "\"{}\" by {} is open with no review comments. Work on {} is waiting on it.",
                    pr.title,
                    snapshot.display_name(&pr.author),
                    pr.branch
                ),
                affected_modules: author_modules(snapshot, &pr.author),
                owner: pr.author.clone(),
                detected_at: view.cutoff,
            }
        })
        .collect()
}

fn inactive_member_blockers(view: &AsOfView<'_>) -> Vec<Blocker> {
    let snapshot = view.snapshot;
    let inactive: BTreeSet<MemberId> = view.inactive_contributors().into_iter().collect();
    let last_commits = view.last_commit_by_author();

    snapshot
        .contributor_ids()
        .into_iter()
        .filter(|id| inactive.contains(id))
        .map(|id| {
            let days = last_commits
                .get(id.as_str())
                .map(|last| (view.cutoff - *last).num_days())
                .unwrap_or_default();
            let name = snapshot.display_name(&id);
            Blocker {
                id: format!("blk-inactive-{id}"),
                severity: Severity::Critical,
                kind: BlockerType::InactiveMember,
                title: format!("{name} has not committed in {days} days"),
                description: format!(
                    "{name} has no commits for {days} days. Modules they work on may stall."
                ),
                affected_modules: author_modules(snapshot, &id),
                owner: id,
                detected_at: view.cutoff,
            }
        })
        .collect()
}

fn abandoned_branch_blockers(view: &AsOfView<'_>) -> Vec<Blocker> {
    let snapshot = view.snapshot;
    let mut abandoned: Vec<_> = view
        .branches()
        .into_iter()
        .filter(|(_, status)| *status == BranchStatus::Abandoned)
        .map(|(branch, _)| branch)
        .collect();
    abandoned.sort_by(|a, b| a.name.cmp(&b.name));

    abandoned
        .into_iter()
        .map(|branch| {
            let days = (view.cutoff - branch.last_commit).num_days();
            Blocker {
                id: format!("blk-abandoned-branch-{}", branch.name),
                severity: Severity::Medium,
                kind: BlockerType::AbandonedBranch,
                title: format!("Branch {} abandoned", branch.name),
                description: format!(
                    "No commits on {} for {} days and it is {} commits behind. Merge or delete it.",
                    branch.name, days, branch.behind
                ),
                affected_modules: author_modules(snapshot, &branch.author),
                owner: branch.author.clone(),
                detected_at: view.cutoff,
            }
        })
        .collect()
}

fn unreviewed_pr_blockers(view: &AsOfView<'_>) -> Vec<Blocker> {
    let snapshot = view.snapshot;

    open_prs_oldest_first(view.unreviewed_pull_requests())
        .into_iter()
        .map(|pr| Blocker {
            id: format!("blk-unreviewed-pr-{}", pr.id),
            severity: Severity::Low,
            kind: BlockerType::UnreviewedPr,
            title: format!("PR #{} has no reviewers", pr.id),
            description: format!(
                "\"{}\" by {} has nobody assigned to review it.",
                pr.title,
                snapshot.display_name(&pr.author)
            ),
            affected_modules: author_modules(snapshot, &pr.author),
            owner: pr.author.clone(),
            detected_at: view.cutoff,
        })
        .collect()
}

pub fn detect_blockers(view: &AsOfView<'_>) -> Vec<Blocker> {
    let mut blockers = stale_pr_blockers(view);
    blockers.extend(inactive_member_blockers(view));
    blockers.extend(abandoned_branch_blockers(view));
    blockers.extend(unreviewed_pr_blockers(view));
    blockers
}
