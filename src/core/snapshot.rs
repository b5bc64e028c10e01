//! The in-memory repository snapshot every derivation pass reads from.

use super::{Branch, Commit, Member, MemberId, PrStatus, PullRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// Commits, pull requests, branches and members at one point in time.
///
/// The core never mutates a snapshot; every pass returns new collections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub team: Team,
}

/// Result of resolving an author id against the team roster.
///
/// Unresolved ids stay unresolved: they are never attributed to
/// another member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRef<'a> {
    Known(&'a Member),
    Unknown(&'a str),
}

impl<'a> MemberRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            MemberRef::Known(member) => &member.id,
            MemberRef::Unknown(id) => id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            MemberRef::Known(member) => &member.name,
            MemberRef::Unknown(id) => id,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, MemberRef::Known(_))
    }
}

impl Snapshot {
    pub fn resolve_member<'a>(&'a self, id: &'a str) -> MemberRef<'a> {
        self.team
            .members
            .iter()
            .find(|m| m.id == id)
            .map(MemberRef::Known)
            .unwrap_or(MemberRef::Unknown(id))
    }

    pub fn display_name(&self, id: &str) -> String {
        self.resolve_member(id).name().to_string()
    }

    /// Team members first (roster order), then unresolved commit authors
    /// sorted by id.
    pub fn contributor_ids(&self) -> Vec<MemberId> {
        let mut ids: Vec<MemberId> = self.team.members.iter().map(|m| m.id.clone()).collect();
        let unknown: BTreeSet<&str> = self
            .commits
            .iter()
            .map(|c| c.author.as_str())
            .filter(|author| !self.resolve_member(author).is_known())
            .collect();
        ids.extend(unknown.into_iter().map(str::to_string));
        ids
    }

    pub fn commits_by<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Commit> + 'a {
        self.commits.iter().filter(move |c| c.author == id)
    }

    pub fn last_commit_by(&self, id: &str) -> Option<DateTime<Utc>> {
        self.commits_by(id).map(|c| c.date).max()
    }

    pub fn first_commit_date(&self) -> Option<DateTime<Utc>> {
        self.commits.iter().map(|c| c.date).min()
    }

    /// Head branch names of merged pull requests.
    pub fn merged_branch_names(&self) -> BTreeSet<&str> {
        self.pull_requests
            .iter()
            .filter(|pr| pr.status == PrStatus::Merged)
            .map(|pr| pr.branch.as_str())
            .collect()
    }

    pub fn open_pull_requests(&self) -> impl Iterator<Item = &PullRequest> {
        self.pull_requests
            .iter()
            .filter(|pr| pr.status == PrStatus::Open)
    }

    pub fn team_size(&self) -> usize {
        self.team.members.len()
    }
}
