use crate::core::time::round_half_away;
use crate::core::Snapshot;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionStat {
    pub name: String,
    pub commits: usize,
    pub additions: u64,
    pub deletions: u64,
    /// Share of all commits, rounded to the nearest whole percent
    pub percentage: u32,
}

pub fn contributions(snapshot: &Snapshot) -> Vec<ContributionStat> {
    let total = snapshot.commits.len();

    snapshot
        .contributor_ids()
        .iter()
        .map(|id| {
            let (commits, additions, deletions) = snapshot
                .commits_by(id)
                .fold((0usize, 0u64, 0u64), |(n, add, del), c| {
                    (n + 1, add + u64::from(c.additions), del + u64::from(c.deletions))
                });
            let percentage = if total == 0 {
                0
            } else {
                round_half_away(commits as f64 / total as f64 * 100.0) as u32
            };
            ContributionStat {
                name: snapshot.display_name(id),
                commits,
                additions,
                deletions,
                percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Commit, Member, ModuleTag, Team};
    use chrono::{TimeZone, Utc};

    fn commit(author: &str, additions: u32) -> Commit {
        Commit {
            id: format!("{author}-{additions}"),
            author: author.to_string(),
            message: "fix: handle empty cart on checkout".to_string(),
            date: Utc.with_ymd_and_hms(2024, 6, 18, 9, 0, 0).unwrap(),
            files: vec!["server/routes/cart.js".to_string()],
            additions,
            deletions: 1,
            module: ModuleTag::Backend,
            flagged: false,
            honesty_suggestion: None,
        }
    }

    #[test]
    fn test_percentages_and_totals() {
        let snapshot = Snapshot {
            commits: vec![commit("ana", 10), commit("ana", 5), commit("ben", 1)],
            team: Team {
                members: vec![
                    Member {
                        id: "ana".into(),
                        name: "Ana Lima".into(),
                        avatar: String::new(),
                        role: String::new(),
                        color: String::new(),
                    },
                    Member {
                        id: "ben".into(),
                        name: "Ben Ortiz".into(),
                        avatar: String::new(),
                        role: String::new(),
                        color: String::new(),
                    },
                ],
                deadline: None,
            },
            ..Default::default()
        };
        let stats = contributions(&snapshot);
        assert_eq!(stats[0].name, "Ana Lima");
        assert_eq!(stats[0].commits, 2);
        assert_eq!(stats[0].additions, 15);
        assert_eq!(stats[0].percentage, 67);
        assert_eq!(stats[1].percentage, 33);
    }

    #[test]
    fn test_no_commits_means_zero_percent() {
        let snapshot = Snapshot {
            team: Team {
                members: vec![Member {
                    id: "ana".into(),
                    name: "Ana Lima".into(),
                    avatar: String::new(),
                    role: String::new(),
                    color: String::new(),
                }],
                deadline: None,
            },
            ..Default::default()
        };
        let stats = contributions(&snapshot);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].percentage, 0);
    }
}
