//! Raw snapshot records as they arrive from the sync collaborator.
//!
//! Every field is optional here; [`super::normalize_snapshot`] decides what
//! is required. Both camelCase and the store's upper-case collection names
//! (`COMMITS`, `PULL_REQUESTS`, ...) are accepted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GitHub ids arrive as numbers for PRs and strings for commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(s) => f.write_str(s),
            RawId::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshot {
    #[serde(default, alias = "COMMITS")]
    pub commits: Vec<RawCommit>,
    #[serde(default, alias = "PULL_REQUESTS")]
    pub pull_requests: Vec<RawPullRequest>,
    #[serde(default, alias = "BRANCHES")]
    pub branches: Vec<RawBranch>,
    #[serde(default, alias = "TEAM")]
    pub team: RawTeam,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    #[serde(default)]
    pub members: Vec<RawMember>,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    pub id: Option<RawId>,
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommit {
    #[serde(alias = "sha")]
    pub id: Option<RawId>,
    pub author: Option<String>,
    pub message: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPullRequest {
    #[serde(alias = "number")]
    pub id: Option<RawId>,
    #[serde(default)]
    pub title: Option<String>,
    pub author: Option<String>,
    pub branch: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub reviewers: Vec<String>,
    #[serde(default)]
    pub comments: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBranch {
    pub name: Option<String>,
    pub last_commit: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub ahead: u32,
    #[serde(default)]
    pub behind: u32,
}
