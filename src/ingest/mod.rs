//! Sync-pass normalization: raw records in, validated [`Snapshot`] out.
//!
//! This is where per-entity derived fields are filled in: each commit's
//! module, honesty flag and suggestion, each PR's age and stagnation,
//! each branch's status, and each member's inferred role. Validation fails
//! fast on the first record with a missing required field or an
//! unparseable timestamp.

pub mod raw;

use crate::config::Settings;
use crate::core::time::start_of_day;
use crate::core::{
    Branch, Commit, Member, PrStatus, PullRequest, Snapshot, Team,
};
use crate::errors::{Error, ValidationError};
use crate::heuristics::lifecycle::{
    branch_stale_days, branch_status_at, is_stagnant_at, merged_branches_at, pr_age_days,
};
use crate::heuristics::{analyze_honesty, infer_role, module_histogram, primary_module};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info_span};

pub use raw::{RawBranch, RawCommit, RawId, RawMember, RawPullRequest, RawSnapshot, RawTeam};

/// Parse RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

fn required_text(
    value: Option<String>,
    entity: &'static str,
    id: &str,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::missing(entity, id, field)),
    }
}

fn required_timestamp(
    value: Option<String>,
    entity: &'static str,
    id: &str,
    field: &'static str,
) -> Result<DateTime<Utc>, ValidationError> {
    let raw = required_text(value, entity, id, field)?;
    parse_timestamp(&raw).ok_or_else(|| ValidationError::timestamp(entity, id, field, raw))
}

fn optional_timestamp(
    value: Option<String>,
    entity: &'static str,
    id: &str,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| ValidationError::timestamp(entity, id, field, raw)),
        _ => Ok(None),
    }
}

fn record_id(id: Option<RawId>, entity: &'static str, index: usize) -> Result<String, ValidationError> {
    match id {
        Some(id) => {
            let id = id.to_string();
            if id.trim().is_empty() {
                Err(ValidationError::missing(entity, format!("#{index}"), "id"))
            } else {
                Ok(id)
            }
        }
        None => Err(ValidationError::missing(entity, format!("#{index}"), "id")),
    }
}

fn parse_pr_status(value: &str, id: &str) -> Result<PrStatus, ValidationError> {
    match value.trim().to_lowercase().as_str() {
        "open" => Ok(PrStatus::Open),
        "merged" => Ok(PrStatus::Merged),
        "closed" => Ok(PrStatus::Closed),
        other => Err(ValidationError::invalid("pull request", id, "status", other)),
    }
}

fn normalize_member(raw: RawMember, index: usize) -> Result<Member, ValidationError> {
    let id = record_id(raw.id, "member", index)?;
    Ok(Member {
        name: raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| id.clone()),
        avatar: raw.avatar.unwrap_or_default(),
        role: String::new(),
        color: raw.color.unwrap_or_default(),
        id,
    })
}

fn normalize_commit(raw: RawCommit, index: usize) -> Result<Commit, ValidationError> {
    const ENTITY: &str = "commit";
    let id = record_id(raw.id, ENTITY, index)?;
    let author = required_text(raw.author, ENTITY, &id, "author")?;
    // An empty message is valid input; it simply scores as vague.
    let message = raw
        .message
        .ok_or_else(|| ValidationError::missing(ENTITY, &id, "message"))?;
    let date = required_timestamp(raw.date, ENTITY, &id, "date")?;

    let honesty = analyze_honesty(&message, &raw.files);
    Ok(Commit {
        module: primary_module(&raw.files),
        flagged: honesty.is_misleading(),
        honesty_suggestion: honesty.suggestion,
        id,
        author,
        message,
        date,
        files: raw.files,
        additions: raw.additions,
        deletions: raw.deletions,
    })
}

fn normalize_pull_request(
    raw: RawPullRequest,
    index: usize,
) -> Result<PullRequest, ValidationError> {
    const ENTITY: &str = "pull request";
    let id = record_id(raw.id, ENTITY, index)?;
    let author = required_text(raw.author, ENTITY, &id, "author")?;
    let branch = required_text(raw.branch, ENTITY, &id, "branch")?;
    let status = parse_pr_status(&required_text(raw.status, ENTITY, &id, "status")?, &id)?;
    let created_at = required_timestamp(raw.created_at, ENTITY, &id, "createdAt")?;
    let merged_at = optional_timestamp(raw.merged_at, ENTITY, &id, "mergedAt")?;
    let closed_at = optional_timestamp(raw.closed_at, ENTITY, &id, "closedAt")?;

    Ok(PullRequest {
        title: raw.title.unwrap_or_default(),
        author,
        branch,
        status,
        created_at,
        merged_at,
        closed_at,
        reviewers: raw.reviewers,
        comments: raw.comments,
        age_days: None,
        stagnant: None,
        id,
    })
}

fn normalize_branch(raw: RawBranch, index: usize) -> Result<Branch, ValidationError> {
    const ENTITY: &str = "branch";
    let name = match raw.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ValidationError::missing(ENTITY, format!("#{index}"), "name")),
    };
    let last_commit = required_timestamp(raw.last_commit, ENTITY, &name, "lastCommit")?;
    let author = required_text(raw.author, ENTITY, &name, "author")?;

    Ok(Branch {
        name,
        last_commit,
        author,
        status: crate::core::BranchStatus::Active,
        ahead: raw.ahead,
        behind: raw.behind,
        stale_days: None,
    })
}

/// Validate a raw snapshot and fill in every derived per-entity field.
pub fn normalize_snapshot(
    raw: RawSnapshot,
    now: DateTime<Utc>,
    settings: &Settings,
) -> Result<Snapshot, ValidationError> {
    let _span = info_span!("ingest").entered();
    let thresholds = &settings.thresholds;

    let mut members = raw
        .team
        .members
        .into_iter()
        .enumerate()
        .map(|(i, m)| normalize_member(m, i))
        .collect::<Result<Vec<_>, _>>()?;

    let deadline = optional_timestamp(raw.team.deadline, "team", "team", "deadline")?;

    let commits = raw
        .commits
        .into_iter()
        .enumerate()
        .map(|(i, c)| normalize_commit(c, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut pull_requests = raw
        .pull_requests
        .into_iter()
        .enumerate()
        .map(|(i, pr)| normalize_pull_request(pr, i))
        .collect::<Result<Vec<_>, _>>()?;

    for pr in &mut pull_requests {
        pr.age_days = Some(pr_age_days(pr, now));
        pr.stagnant = Some(is_stagnant_at(pr, now, thresholds));
    }

    let mut branches = raw
        .branches
        .into_iter()
        .enumerate()
        .map(|(i, b)| normalize_branch(b, i))
        .collect::<Result<Vec<_>, _>>()?;

    {
        let merged = merged_branches_at(&pull_requests, now);
        for branch in &mut branches {
            branch.status = branch_status_at(branch, &merged, now, thresholds);
            branch.stale_days = Some(branch_stale_days(branch, now));
        }
    }

    for member in &mut members {
        let histogram = module_histogram(commits.iter().filter(|c| c.author == member.id));
        member.role = infer_role(&histogram).to_string();
    }

    debug!(
        commits = commits.len(),
        pull_requests = pull_requests.len(),
        branches = branches.len(),
        members = members.len(),
        "Snapshot normalized"
    );

    Ok(Snapshot {
        commits,
        pull_requests,
        branches,
        team: Team { members, deadline },
    })
}

/// Deserialize a raw snapshot document and normalize it.
pub fn parse_snapshot_json(
    json: &str,
    now: DateTime<Utc>,
    settings: &Settings,
) -> Result<Snapshot, Error> {
    let raw: RawSnapshot = serde_json::from_str(json)?;
    Ok(normalize_snapshot(raw, now, settings)?)
}
