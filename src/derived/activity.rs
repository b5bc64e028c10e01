//! Per-member "what are they working on right now" status.

use crate::core::time::days_between;
use crate::core::{BranchStatus, MemberId, ModuleTag};
use crate::metrics::AsOfView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Active,
    Idle,
    Inactive,
    NoActivity,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Inactive => "inactive",
            Self::NoActivity => "no_activity",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberActivity {
    pub member_id: MemberId,
    pub name: String,
    pub status: ActivityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_last_commit: Option<i64>,
    pub open_pull_requests: usize,
    pub active_branches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_module: Option<ModuleTag>,
}

pub fn member_activity(view: &AsOfView<'_>) -> Vec<MemberActivity> {
    let snapshot = view.snapshot;
    let thresholds = &view.settings.thresholds;
    let branches = view.branches();
    let open_prs: Vec<_> = view.open_pull_requests().collect();

    snapshot
        .contributor_ids()
        .into_iter()
        .map(|id| {
            let latest = view
                .commits()
                .iter()
                .filter(|c| c.author == id)
                .max_by(|a, b| a.date.cmp(&b.date).then_with(|| b.id.cmp(&a.id)));

            let status = match latest {
                None => ActivityStatus::NoActivity,
                Some(c) => {
                    let idle_for = days_between(c.date, view.cutoff);
                    if idle_for <= thresholds.active_days {
                        ActivityStatus::Active
                    } else if idle_for <= thresholds.inactive_days {
                        ActivityStatus::Idle
                    } else {
                        ActivityStatus::Inactive
                    }
                }
            };

            MemberActivity {
                name: snapshot.display_name(&id),
                status,
                last_commit: latest.map(|c| c.date),
                days_since_last_commit: latest.map(|c| (view.cutoff - c.date).num_days()),
                open_pull_requests: open_prs.iter().filter(|pr| pr.author == id).count(),
                active_branches: branches
                    .iter()
                    .filter(|(b, s)| b.author == id && *s == BranchStatus::Active)
                    .count(),
                current_module: latest.map(|c| c.module),
                member_id: id,
            }
        })
        .collect()
}
