use super::view::AsOfView;
use super::RiskReading;
use crate::core::time::score;
use serde::{Deserialize, Serialize};

pub const STAGNANT_PR_WEIGHT: f64 = 15.0;
pub const INACTIVE_CONTRIBUTOR_WEIGHT: f64 = 18.0;
pub const UNREVIEWED_PR_WEIGHT: f64 = 8.0;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFactors {
    pub stagnant_prs: usize,
    pub inactive_contributors: usize,
    pub unreviewed_prs: usize,
}

pub fn delivery_risk(view: &AsOfView<'_>) -> RiskReading<DeliveryFactors> {
    let factors = DeliveryFactors {
        stagnant_prs: view.stagnant_pull_requests().count(),
        inactive_contributors: view.inactive_contributors().len(),
        unreviewed_prs: view.unreviewed_pull_requests().count(),
    };

    let raw = factors.stagnant_prs as f64 * STAGNANT_PR_WEIGHT
        + factors.inactive_contributors as f64 * INACTIVE_CONTRIBUTOR_WEIGHT
        + factors.unreviewed_prs as f64 * UNREVIEWED_PR_WEIGHT;

    RiskReading {
        score: score(raw),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::core::{Commit, ModuleTag, PrStatus, PullRequest, Snapshot};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn open_pr(id: &str, age_days: i64, comments: u32, reviewers: &[&str]) -> PullRequest {
        PullRequest {
            id: id.to_string(),
            title: format!("PR {id}"),
            author: "ana".to_string(),
            branch: format!("feature/{id}"),
            status: PrStatus::Open,
            created_at: now() - Duration::days(age_days),
            merged_at: None,
            closed_at: None,
            reviewers: reviewers.iter().map(|r| r.to_string()).collect(),
            comments,
            age_days: None,
            stagnant: None,
        }
    }

    fn commit(author: &str, days_ago: i64) -> Commit {
        Commit {
            id: format!("{author}-{days_ago}"),
            author: author.to_string(),
            message: "feat: add order history endpoint".to_string(),
            date: now() - Duration::days(days_ago),
            files: vec!["server/routes/orders.js".to_string()],
            additions: 10,
            deletions: 2,
            module: ModuleTag::Backend,
            flagged: false,
            honesty_suggestion: None,
        }
    }

    #[test]
    fn test_single_inactive_contributor_scores_18() {
        let snapshot = Snapshot {
            commits: vec![commit("ana", 6)],
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = delivery_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.score, 18);
        assert_eq!(reading.factors.inactive_contributors, 1);
    }

    #[test]
    fn test_stagnant_and_unreviewed_not_double_counted() {
        let snapshot = Snapshot {
            pull_requests: vec![
                open_pr("1", 5, 0, &[]),      // stagnant
                open_pr("2", 1, 0, &[]),      // unreviewed
                open_pr("3", 1, 2, &["ben"]), // healthy
            ],
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = delivery_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(
            reading.factors,
            DeliveryFactors {
                stagnant_prs: 1,
                inactive_contributors: 0,
                unreviewed_prs: 1,
            }
        );
        assert_eq!(reading.score, 23);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let snapshot = Snapshot {
            pull_requests: (0..10).map(|i| open_pr(&i.to_string(), 9, 0, &[])).collect(),
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = delivery_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.factors.stagnant_prs, 10);
        assert_eq!(reading.score, 100);
    }
}
