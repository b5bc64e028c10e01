// Shared fixtures for repopulse integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use repopulse::config::Settings;
use repopulse::ingest::{
    normalize_snapshot, RawBranch, RawCommit, RawId, RawMember, RawPullRequest, RawSnapshot,
    RawTeam,
};
use repopulse::Snapshot;

/// Fixed clock every fixture is relative to.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub fn ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub fn member(id: &str, name: &str) -> RawMember {
    RawMember {
        id: Some(RawId::Text(id.to_string())),
        name: Some(name.to_string()),
        avatar: None,
        color: None,
    }
}

pub fn commit(id: &str, author: &str, message: &str, at: DateTime<Utc>, files: &[&str]) -> RawCommit {
    RawCommit {
        id: Some(RawId::Text(id.to_string())),
        author: Some(author.to_string()),
        message: Some(message.to_string()),
        date: Some(ts(at)),
        files: files.iter().map(|f| f.to_string()).collect(),
        additions: 25,
        deletions: 5,
    }
}

pub fn open_pr(number: i64, author: &str, created: DateTime<Utc>, reviewers: &[&str]) -> RawPullRequest {
    RawPullRequest {
        id: Some(RawId::Number(number)),
        title: Some(format!("Feature {number}")),
        author: Some(author.to_string()),
        branch: Some(format!("feature/{number}")),
        status: Some("open".to_string()),
        created_at: Some(ts(created)),
        merged_at: None,
        closed_at: None,
        reviewers: reviewers.iter().map(|r| r.to_string()).collect(),
        comments: 0,
    }
}

pub fn branch(name: &str, author: &str, last_commit: DateTime<Utc>, behind: u32) -> RawBranch {
    RawBranch {
        name: Some(name.to_string()),
        last_commit: Some(ts(last_commit)),
        author: Some(author.to_string()),
        ahead: 1,
        behind,
    }
}

/// Builder over the raw wire records, normalized at [`now`].
#[derive(Default)]
pub struct SnapshotBuilder {
    raw: RawSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, id: &str, name: &str) -> Self {
        self.raw.team.members.push(member(id, name));
        self
    }

    pub fn deadline(mut self, at: DateTime<Utc>) -> Self {
        self.raw.team.deadline = Some(ts(at));
        self
    }

    pub fn commit(mut self, commit: RawCommit) -> Self {
        self.raw.commits.push(commit);
        self
    }

    pub fn pull_request(mut self, pr: RawPullRequest) -> Self {
        self.raw.pull_requests.push(pr);
        self
    }

    pub fn branch(mut self, branch: RawBranch) -> Self {
        self.raw.branches.push(branch);
        self
    }

    pub fn raw(self) -> RawSnapshot {
        self.raw
    }

    pub fn build(self) -> Snapshot {
        normalize_snapshot(self.raw, now(), &Settings::default()).unwrap()
    }
}

/// One member whose only work is two backend commits six days ago.
pub fn lone_backend_member() -> Snapshot {
    SnapshotBuilder::new()
        .member("ana", "Ana")
        .commit(commit(
            "c1",
            "ana",
            "feat: add order service endpoint",
            days_ago(6),
            &["server/services/orders.js"],
        ))
        .commit(commit(
            "c2",
            "ana",
            "refactor: move cart routes into module",
            days_ago(6) + Duration::hours(2),
            &["server/routes/cart.js"],
        ))
        .build()
}

/// A small team with work in flight across several modules.
pub fn busy_team() -> Snapshot {
    SnapshotBuilder::new()
        .member("ana", "Ana")
        .member("ben", "Ben")
        .member("cy", "Cy")
        .deadline(now() + Duration::days(3))
        .commit(commit(
            "c1",
            "ana",
            "feat: add login endpoint with jwt refresh",
            days_ago(9),
            &["server/auth/login.js", "server/auth/jwt.js"],
        ))
        .commit(commit("c2", "ben", "fix", days_ago(8), &["client/pages/Cart.jsx"]))
        .commit(commit(
            "c3",
            "ana",
            "feat: add order service endpoint",
            days_ago(4),
            &["server/services/orders.js", "client/pages/Orders.jsx"],
        ))
        .commit(commit(
            "c4",
            "cy",
            "Revert \"feat: add order service endpoint\"",
            days_ago(1),
            &["server/services/orders.js"],
        ))
        .commit(commit(
            "c5",
            "mallory",
            "chore: bump dependencies in package.json",
            days_ago(1),
            &["package.json"],
        ))
        .pull_request(open_pr(10, "ana", days_ago(10), &[]))
        .pull_request(open_pr(11, "ben", days_ago(4), &[]))
        .pull_request(open_pr(12, "cy", days_ago(1), &[]))
        .branch(branch("feature/old-search", "ben", days_ago(20), 30))
        .build()
}
