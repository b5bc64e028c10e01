use crate::core::MemberId;
use crate::metrics::AsOfView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contributor whose latest commit is older than the inactivity threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostingAlert {
    pub member_id: MemberId,
    pub name: String,
    pub last_commit: DateTime<Utc>,
    pub days_inactive: i64,
}

/// Longest-silent contributor first, then by id.
pub fn ghosting_alerts(view: &AsOfView<'_>) -> Vec<GhostingAlert> {
    let last_commits = view.last_commit_by_author();

    let mut alerts: Vec<GhostingAlert> = view
        .inactive_contributors()
        .into_iter()
        .filter_map(|id| {
            let last_commit = *last_commits.get(id.as_str())?;
            Some(GhostingAlert {
                name: view.snapshot.display_name(&id),
                days_inactive: (view.cutoff - last_commit).num_days(),
                member_id: id,
                last_commit,
            })
        })
        .collect();

    alerts.sort_by(|a, b| {
        a.last_commit
            .cmp(&b.last_commit)
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::core::{Commit, ModuleTag, Snapshot};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn commit(author: &str, hours_ago: i64) -> Commit {
        Commit {
            id: format!("{author}-{hours_ago}"),
            author: author.to_string(),
            message: "docs: describe local setup steps".to_string(),
            date: now() - Duration::hours(hours_ago),
            files: vec!["README.md".to_string()],
            additions: 12,
            deletions: 0,
            module: ModuleTag::Setup,
            flagged: false,
            honesty_suggestion: None,
        }
    }

    #[test]
    fn test_only_members_past_threshold_are_ghosting() {
        let snapshot = Snapshot {
            commits: vec![
                commit("ana", 24 * 5 + 1),
                commit("ben", 24 * 5 - 1),
                commit("cy", 24 * 12),
            ],
            ..Default::default()
        };
        let settings = Settings::default();
        let alerts = ghosting_alerts(&AsOfView::new(&snapshot, &settings, now()));
        let ids: Vec<&str> = alerts.iter().map(|a| a.member_id.as_str()).collect();
        assert_eq!(ids, vec!["cy", "ana"]);
        assert_eq!(alerts[0].days_inactive, 12);
        assert_eq!(alerts[1].days_inactive, 5);
    }
}
