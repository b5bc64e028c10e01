use super::view::AsOfView;
use super::RiskReading;
use crate::core::time::score;
use crate::core::Commit;
use crate::heuristics::honesty::is_vague;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const VAGUE_SHARE_WEIGHT: f64 = 50.0;
pub const LARGE_SHARE_WEIGHT: f64 = 25.0;
pub const REVERT_WEIGHT: f64 = 10.0;
pub const NEAR_DEADLINE_WEIGHT: f64 = 5.0;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityFactors {
    pub total_commits: usize,
    pub vague_commits: usize,
    pub large_commits: usize,
    pub revert_commits: usize,
    pub near_deadline_commits: usize,
}

pub fn is_revert(commit: &Commit) -> bool {
    commit
        .message
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("revert"))
}

/// Committed inside the window that closes at the deadline.
pub fn is_near_deadline(commit: &Commit, deadline: Option<DateTime<Utc>>, window_hours: i64) -> bool {
    deadline.is_some_and(|deadline| {
        commit.date <= deadline && commit.date >= deadline - Duration::hours(window_hours)
    })
}

pub fn stability_risk(view: &AsOfView<'_>) -> RiskReading<StabilityFactors> {
    let thresholds = &view.settings.thresholds;
    let deadline = view.snapshot.team.deadline;
    let commits = view.commits();

    let factors = StabilityFactors {
        total_commits: commits.len(),
        vague_commits: commits.iter().filter(|c| is_vague(&c.message)).count(),
        large_commits: commits
            .iter()
            .filter(|c| c.files.len() > thresholds.large_commit_files)
            .count(),
        revert_commits: commits.iter().filter(|c| is_revert(c)).count(),
        near_deadline_commits: commits
            .iter()
            .filter(|c| is_near_deadline(c, deadline, thresholds.deadline_window_hours))
            .count(),
    };

    if factors.total_commits == 0 {
        return RiskReading { score: 0, factors };
    }

    let total = factors.total_commits as f64;
    let raw = factors.vague_commits as f64 / total * VAGUE_SHARE_WEIGHT
        + factors.large_commits as f64 / total * LARGE_SHARE_WEIGHT
        + factors.revert_commits as f64 * REVERT_WEIGHT
        + factors.near_deadline_commits as f64 * NEAR_DEADLINE_WEIGHT;

    RiskReading {
        score: score(raw),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::core::{ModuleTag, Snapshot, Team};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn commit(message: &str, files: usize, hours_ago: i64) -> Commit {
        Commit {
            id: format!("{message}-{hours_ago}"),
            author: "ana".to_string(),
            message: message.to_string(),
            date: now() - Duration::hours(hours_ago),
            files: (0..files).map(|i| format!("client/components/C{i}.jsx")).collect(),
            additions: 1,
            deletions: 1,
            module: ModuleTag::Frontend,
            flagged: false,
            honesty_suggestion: None,
        }
    }

    #[test]
    fn test_empty_history_is_zero_risk() {
        let snapshot = Snapshot::default();
        let settings = Settings::default();
        let reading = stability_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.score, 0);
        assert_eq!(reading.factors, StabilityFactors::default());
    }

    #[test]
    fn test_vague_and_large_shares() {
        let snapshot = Snapshot {
            commits: vec![
                commit("wip", 1, 5),
                commit("feat: render the cart summary panel", 6, 4),
                commit("feat: add checkout button to cart page", 1, 3),
                commit("style: align navbar items on mobile", 1, 2),
            ],
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = stability_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.factors.vague_commits, 1);
        assert_eq!(reading.factors.large_commits, 1);
        // 1/4*50 + 1/4*25 = 18.75
        assert_eq!(reading.score, 19);
    }

    #[test]
    fn test_revert_detection_is_case_insensitive() {
        assert!(is_revert(&commit("Revert \"feat: add cart\"", 1, 1)));
        assert!(is_revert(&commit("REVERT broken migration", 1, 1)));
        assert!(!is_revert(&commit("feat: revert button", 1, 1)));
    }

    #[test]
    fn test_near_deadline_window() {
        let deadline = Some(now());
        assert!(is_near_deadline(&commit("feat: final polish pass", 1, 23), deadline, 24));
        assert!(!is_near_deadline(&commit("feat: final polish pass", 1, 25), deadline, 24));
        assert!(!is_near_deadline(&commit("feat: final polish pass", 1, 23), None, 24));
    }

    #[test]
    fn test_reverts_and_deadline_pushes_add_up() {
        let snapshot = Snapshot {
            commits: vec![
                commit("revert: undo payment provider switch", 1, 2),
                commit("feat: add order confirmation email", 1, 1),
            ],
            team: Team {
                members: vec![],
                deadline: Some(now() + Duration::hours(2)),
            },
            ..Default::default()
        };
        let settings = Settings::default();
        let reading = stability_risk(&AsOfView::new(&snapshot, &settings, now()));
        assert_eq!(reading.factors.revert_commits, 1);
        assert_eq!(reading.factors.near_deadline_commits, 2);
        assert_eq!(reading.score, 20);
    }
}
