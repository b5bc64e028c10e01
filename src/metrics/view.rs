//! The as-of view: the part of a snapshot visible at a cutoff instant.
//!
//! Every risk formula reads the snapshot exclusively through this view, so
//! the live reading (cutoff = now) and each historical trend point (cutoff =
//! end of that day) run the exact same code. Nothing dated after the cutoff
//! is reachable from a view.

use crate::config::Settings;
use crate::core::time::days_between;
use crate::core::{Branch, BranchStatus, Commit, MemberId, ModuleTag, PullRequest, Snapshot};
use crate::heuristics::classify_files;
use crate::heuristics::lifecycle::{
    branch_status_at, is_open_at, is_stagnant_at, is_unreviewed_at, merged_branches_at,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

pub struct AsOfView<'a> {
    pub snapshot: &'a Snapshot,
    pub settings: &'a Settings,
    pub cutoff: DateTime<Utc>,
    commits: Vec<&'a Commit>,
}

impl<'a> AsOfView<'a> {
    pub fn new(snapshot: &'a Snapshot, settings: &'a Settings, cutoff: DateTime<Utc>) -> Self {
        let commits = snapshot
            .commits
            .iter()
            .filter(|c| c.date <= cutoff)
            .collect();
        Self {
            snapshot,
            settings,
            cutoff,
            commits,
        }
    }

    pub fn commits(&self) -> &[&'a Commit] {
        &self.commits
    }

    /// PRs that existed and were still open at the cutoff.
    pub fn open_pull_requests(&self) -> impl Iterator<Item = &'a PullRequest> + '_ {
        self.snapshot
            .pull_requests
            .iter()
            .filter(move |pr| is_open_at(pr, self.cutoff))
    }

    pub fn stagnant_pull_requests(&self) -> impl Iterator<Item = &'a PullRequest> + '_ {
        self.snapshot
            .pull_requests
            .iter()
            .filter(move |pr| is_stagnant_at(pr, self.cutoff, &self.settings.thresholds))
    }

    /// Open, no reviewers, and not already counted as stagnant.
    pub fn unreviewed_pull_requests(&self) -> impl Iterator<Item = &'a PullRequest> + '_ {
        self.snapshot.pull_requests.iter().filter(move |pr| {
            is_unreviewed_at(pr, self.cutoff)
                && !is_stagnant_at(pr, self.cutoff, &self.settings.thresholds)
        })
    }

    /// Branches with activity at or before the cutoff, with their status
    /// re-derived at the cutoff.
    pub fn branches(&self) -> Vec<(&'a Branch, BranchStatus)> {
        let merged = merged_branches_at(&self.snapshot.pull_requests, self.cutoff);
        self.snapshot
            .branches
            .iter()
            .filter(|b| b.last_commit <= self.cutoff)
            .map(|b| {
                let status = branch_status_at(b, &merged, self.cutoff, &self.settings.thresholds);
                (b, status)
            })
            .collect()
    }

    /// Latest visible commit per author.
    pub fn last_commit_by_author(&self) -> BTreeMap<&'a str, DateTime<Utc>> {
        self.commits.iter().fold(BTreeMap::new(), |mut acc, c| {
            let entry = acc.entry(c.author.as_str()).or_insert(c.date);
            if c.date > *entry {
                *entry = c.date;
            }
            acc
        })
    }

    /// Authors whose latest visible commit is older than the inactivity
    /// threshold (fractional days).
    pub fn inactive_contributors(&self) -> Vec<MemberId> {
        let threshold = self.settings.thresholds.inactive_days;
        self.last_commit_by_author()
            .into_iter()
            .filter(|(_, last)| days_between(*last, self.cutoff) > threshold)
            .map(|(author, _)| author.to_string())
            .collect()
    }

    /// Roster ids first, then visible authors missing from the roster,
    /// sorted by id.
    pub fn contributor_ids(&self) -> Vec<MemberId> {
        let mut ids: Vec<MemberId> = self
            .snapshot
            .team
            .members
            .iter()
            .map(|m| m.id.clone())
            .collect();
        let unknown: BTreeSet<&str> = self
            .commits
            .iter()
            .map(|c| c.author.as_str())
            .filter(|author| !self.snapshot.resolve_member(author).is_known())
            .collect();
        ids.extend(unknown.into_iter().map(str::to_string));
        ids
    }

    pub fn modules(&self) -> BTreeSet<ModuleTag> {
        self.commits
            .iter()
            .flat_map(|c| classify_files(&c.files))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PrStatus;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn commit(id: &str, author: &str, days_ago: i64) -> Commit {
        Commit {
            id: id.to_string(),
            author: author.to_string(),
            message: "feat: add search endpoint".to_string(),
            date: now() - Duration::days(days_ago),
            files: vec!["api/search.py".to_string()],
            additions: 1,
            deletions: 0,
            module: ModuleTag::Search,
            flagged: false,
            honesty_suggestion: None,
        }
    }

    #[test]
    fn test_view_hides_commits_after_cutoff() {
        let snapshot = Snapshot {
            commits: vec![commit("a", "ana", 10), commit("b", "ana", 1)],
            ..Default::default()
        };
        let settings = Settings::default();
        let view = AsOfView::new(&snapshot, &settings, now() - Duration::days(5));
        assert_eq!(view.commits().len(), 1);
        assert_eq!(view.commits()[0].id, "a");
    }

    #[test]
    fn test_inactive_contributors_measured_from_cutoff() {
        let snapshot = Snapshot {
            commits: vec![commit("a", "ana", 6), commit("b", "ben", 1)],
            ..Default::default()
        };
        let settings = Settings::default();
        let view = AsOfView::new(&snapshot, &settings, now());
        assert_eq!(view.inactive_contributors(), vec!["ana".to_string()]);

        let earlier = AsOfView::new(&snapshot, &settings, now() - Duration::days(2));
        assert!(earlier.inactive_contributors().is_empty());
    }

    #[test]
    fn test_pr_not_visible_before_creation() {
        let snapshot = Snapshot {
            pull_requests: vec![PullRequest {
                id: "1".into(),
                title: "x".into(),
                author: "ana".into(),
                branch: "feature/x".into(),
                status: PrStatus::Open,
                created_at: now() - Duration::days(2),
                merged_at: None,
                closed_at: None,
                reviewers: vec![],
                comments: 0,
                age_days: None,
                stagnant: None,
            }],
            ..Default::default()
        };
        let settings = Settings::default();
        assert_eq!(AsOfView::new(&snapshot, &settings, now()).open_pull_requests().count(), 1);
        assert_eq!(
            AsOfView::new(&snapshot, &settings, now() - Duration::days(3))
                .open_pull_requests()
                .count(),
            0
        );
    }
}
