use super::health::health_as_of;
use super::view::AsOfView;
use crate::config::Settings;
use crate::core::time::{days_inclusive, end_of_day};
use crate::core::Snapshot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const EMPTY_HISTORY_MESSAGE: &str =
    "No commits yet. The health trend starts on the day of the first commit.";
pub const FUTURE_HISTORY_MESSAGE: &str =
    "Every commit is dated after the reporting time. The health trend starts once one of them is visible.";
pub const SINGLE_DAY_MESSAGE: &str =
    "Only one day of history so far. The trend fills in as more days of commits arrive.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub score: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthTrend {
    pub trend: Vec<TrendPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn without_points(message: &str) -> HealthTrend {
    HealthTrend {
        trend: Vec::new(),
        message: Some(message.to_string()),
    }
}

/// One point per UTC calendar day from the first commit visible at `now`
/// through `now`.
///
/// Each point only sees what was visible by the end of its day (or `now`
/// for today), so commits added later never change an earlier point.
pub fn health_trend(snapshot: &Snapshot, settings: &Settings, now: DateTime<Utc>) -> HealthTrend {
    if snapshot.commits.is_empty() {
        return without_points(EMPTY_HISTORY_MESSAGE);
    }
    let Some(first) = snapshot
        .commits
        .iter()
        .map(|c| c.date)
        .filter(|date| *date <= now)
        .min()
    else {
        return without_points(FUTURE_HISTORY_MESSAGE);
    };

    let trend: Vec<TrendPoint> = days_inclusive(first.date_naive(), now.date_naive())
        .map(|date| {
            let cutoff = end_of_day(date).min(now);
            let health = health_as_of(&AsOfView::new(snapshot, settings, cutoff));
            TrendPoint {
                date,
                score: health.overall,
            }
        })
        .collect();

    debug!(points = trend.len(), "health trend computed");

    let message = match trend.len() {
        0 => Some(EMPTY_HISTORY_MESSAGE.to_string()),
        1 => Some(SINGLE_DAY_MESSAGE.to_string()),
        _ => None,
    };

    HealthTrend { trend, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Commit, ModuleTag};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn commit(id: &str, date: DateTime<Utc>) -> Commit {
        Commit {
            id: id.to_string(),
            author: "ana".to_string(),
            message: "feat: add password reset endpoint".to_string(),
            date,
            files: vec!["server/auth/reset.js".to_string()],
            additions: 30,
            deletions: 2,
            module: ModuleTag::Auth,
            flagged: false,
            honesty_suggestion: None,
        }
    }

    #[test]
    fn test_empty_history_has_message() {
        let trend = health_trend(&Snapshot::default(), &Settings::default(), now());
        assert!(trend.trend.is_empty());
        assert_eq!(trend.message.as_deref(), Some(EMPTY_HISTORY_MESSAGE));
    }

    #[test]
    fn test_only_future_commits_is_not_empty_history() {
        let snapshot = Snapshot {
            commits: vec![commit("a", now() + Duration::days(2))],
            ..Default::default()
        };
        let trend = health_trend(&snapshot, &Settings::default(), now());
        assert!(trend.trend.is_empty());
        assert_eq!(trend.message.as_deref(), Some(FUTURE_HISTORY_MESSAGE));
    }

    #[test]
    fn test_trend_starts_at_first_visible_commit() {
        let snapshot = Snapshot {
            commits: vec![
                commit("a", now() - Duration::days(2)),
                commit("b", now() + Duration::days(1)),
            ],
            ..Default::default()
        };
        let trend = health_trend(&snapshot, &Settings::default(), now());
        assert_eq!(trend.trend.len(), 3);
        assert_eq!(trend.trend[0].date, (now() - Duration::days(2)).date_naive());
    }

    #[test]
    fn test_single_day_history() {
        let snapshot = Snapshot {
            commits: vec![commit("a", now() - Duration::hours(3))],
            ..Default::default()
        };
        let trend = health_trend(&snapshot, &Settings::default(), now());
        assert_eq!(trend.trend.len(), 1);
        assert_eq!(trend.message.as_deref(), Some(SINGLE_DAY_MESSAGE));
    }

    #[test]
    fn test_one_point_per_day_without_gaps() {
        let snapshot = Snapshot {
            commits: vec![commit("a", now() - Duration::days(9))],
            ..Default::default()
        };
        let trend = health_trend(&snapshot, &Settings::default(), now());
        assert_eq!(trend.trend.len(), 10);
        assert!(trend.message.is_none());
        for pair in trend.trend.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
        assert_eq!(trend.trend[0].date, (now() - Duration::days(9)).date_naive());
        assert_eq!(trend.trend[9].date, now().date_naive());
    }

    #[test]
    fn test_contributor_goes_inactive_over_time() {
        let snapshot = Snapshot {
            commits: vec![commit("a", now() - Duration::days(9))],
            ..Default::default()
        };
        let settings = Settings::default();
        let trend = health_trend(&snapshot, &settings, now());
        // single owner of auth throughout: integration 40 -> 88 overall
        assert_eq!(trend.trend[0].score, 88);
        // inactive from day 6 onward adds delivery 18
        assert_eq!(trend.trend[9].score, 80);
    }
}
