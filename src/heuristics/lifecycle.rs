//! Pull request and branch lifecycle rules evaluated at a cutoff instant.
//!
//! Ingestion, the derived-entity builder and the metrics engine all go
//! through these functions, so "stagnant" or "abandoned" means the same
//! thing everywhere. Passing `now` gives the live reading; passing an
//! earlier cutoff reconstructs what was known at that time.

use crate::config::{Settings, ThresholdsConfig};
use crate::core::time::whole_days_between;
use crate::core::{Branch, BranchStatus, PrStatus, PullRequest};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Whole days a PR has been open at `as_of` (never negative).
pub fn pr_age_days(pr: &PullRequest, as_of: DateTime<Utc>) -> i64 {
    whole_days_between(pr.created_at, as_of).max(0)
}

/// Status of a PR as it stood at `as_of`; `None` before it was created.
///
/// A closed PR without `closed_at` is treated as closed for its whole
/// visible lifetime.
pub fn pr_status_at(pr: &PullRequest, as_of: DateTime<Utc>) -> Option<PrStatus> {
    if pr.created_at > as_of {
        return None;
    }
    let status = match pr.status {
        PrStatus::Open => PrStatus::Open,
        PrStatus::Merged => match pr.merged_at {
            Some(merged) if merged > as_of => PrStatus::Open,
            _ => PrStatus::Merged,
        },
        PrStatus::Closed => match pr.closed_at {
            Some(closed) if closed > as_of => PrStatus::Open,
            _ => PrStatus::Closed,
        },
    };
    Some(status)
}

pub fn is_open_at(pr: &PullRequest, as_of: DateTime<Utc>) -> bool {
    pr_status_at(pr, as_of) == Some(PrStatus::Open)
}

/// Open, uncommented, and older than the stagnation threshold.
///
/// Age is measured in the same whole days as [`pr_age_days`], so a PR is
/// never stagnant while its reported age still equals the threshold.
pub fn is_stagnant_at(pr: &PullRequest, as_of: DateTime<Utc>, thresholds: &ThresholdsConfig) -> bool {
    is_open_at(pr, as_of) && pr.comments == 0 && pr_age_days(pr, as_of) > thresholds.stagnant_pr_days
}

/// Open with nobody requested for review.
pub fn is_unreviewed_at(pr: &PullRequest, as_of: DateTime<Utc>) -> bool {
    is_open_at(pr, as_of) && pr.reviewers.is_empty()
}

/// Head branches of PRs merged by `as_of`.
pub fn merged_branches_at(prs: &[PullRequest], as_of: DateTime<Utc>) -> BTreeSet<&str> {
    prs.iter()
        .filter(|pr| pr_status_at(pr, as_of) == Some(PrStatus::Merged))
        .map(|pr| pr.branch.as_str())
        .collect()
}

pub fn branch_stale_days(branch: &Branch, as_of: DateTime<Utc>) -> i64 {
    whole_days_between(branch.last_commit, as_of).max(0)
}

/// merged > abandoned > stale > active, in that order of precedence.
pub fn branch_status_at(
    branch: &Branch,
    merged_branches: &BTreeSet<&str>,
    as_of: DateTime<Utc>,
    thresholds: &ThresholdsConfig,
) -> BranchStatus {
    if merged_branches.contains(branch.name.as_str()) {
        return BranchStatus::Merged;
    }
    let age = branch_stale_days(branch, as_of);
    if age > thresholds.abandoned_branch_days {
        BranchStatus::Abandoned
    } else if age > thresholds.stale_branch_days {
        BranchStatus::Stale
    } else {
        BranchStatus::Active
    }
}

/// Non-main, unmerged, and either far behind or gone stale.
pub fn is_diverged(branch: &Branch, status: BranchStatus, settings: &Settings) -> bool {
    if settings.is_main_branch(&branch.name) || status == BranchStatus::Merged {
        return false;
    }
    branch.behind > settings.thresholds.diverged_behind
        || matches!(status, BranchStatus::Abandoned | BranchStatus::Stale)
}
