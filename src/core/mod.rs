pub mod snapshot;
pub mod time;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use snapshot::{MemberRef, Snapshot, Team};

/// Team member identifier as it appears in commit/PR author fields.
pub type MemberId = String;

/// Coarse functional area inferred from file paths.
///
/// Variants are declared alphabetically so that `Ord` matches name order,
/// which is what every explicit tie-break in the crate relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleTag {
    Auth,
    Backend,
    Database,
    Devops,
    Frontend,
    Messaging,
    Notifications,
    Search,
    Setup,
    Testing,
}

impl ModuleTag {
    pub const ALL: [ModuleTag; 10] = [
        ModuleTag::Auth,
        ModuleTag::Backend,
        ModuleTag::Database,
        ModuleTag::Devops,
        ModuleTag::Frontend,
        ModuleTag::Messaging,
        ModuleTag::Notifications,
        ModuleTag::Search,
        ModuleTag::Setup,
        ModuleTag::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleTag::Auth => "auth",
            ModuleTag::Backend => "backend",
            ModuleTag::Database => "database",
            ModuleTag::Devops => "devops",
            ModuleTag::Frontend => "frontend",
            ModuleTag::Messaging => "messaging",
            ModuleTag::Notifications => "notifications",
            ModuleTag::Search => "search",
            ModuleTag::Setup => "setup",
            ModuleTag::Testing => "testing",
        }
    }

    /// `setup` is the catch-all bucket and never counts as real module work.
    pub fn is_trivial(&self) -> bool {
        matches!(self, ModuleTag::Setup)
    }
}

impl fmt::Display for ModuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    pub author: MemberId,
    pub message: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    /// Module of the first touched file
    pub module: ModuleTag,
    /// Set when the honesty verdict is misleading
    #[serde(default)]
    pub flagged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honesty_suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrStatus {
    Open,
    Merged,
    Closed,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::Open => "open",
            PrStatus::Merged => "merged",
            PrStatus::Closed => "closed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: String,
    pub title: String,
    pub author: MemberId,
    pub branch: String,
    pub status: PrStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewers: Vec<MemberId>,
    #[serde(default)]
    pub comments: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagnant: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchStatus {
    Active,
    Merged,
    Stale,
    Abandoned,
}

impl BranchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchStatus::Active => "active",
            BranchStatus::Merged => "merged",
            BranchStatus::Stale => "stale",
            BranchStatus::Abandoned => "abandoned",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    pub last_commit: DateTime<Utc>,
    pub author: MemberId,
    pub status: BranchStatus,
    #[serde(default)]
    pub ahead: u32,
    #[serde(default)]
    pub behind: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_days: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    /// Derived from the module histogram on every ingestion pass
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub color: String,
}
