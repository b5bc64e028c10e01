use crate::core::ModuleTag;
use crate::metrics::integration::module_ownership;
use crate::metrics::AsOfView;
use serde::{Deserialize, Serialize};

/// Module x contributor ownership matrix in whole percent.
///
/// `data[m][c]` is contributor `c`'s share of the commits touching module
/// `m`. Every non-empty row sums to exactly 100.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusFactor {
    pub modules: Vec<ModuleTag>,
    pub contributors: Vec<String>,
    pub data: Vec<Vec<u32>>,
}

impl BusFactor {
    /// Modules whose commits all come from a single contributor.
    pub fn single_contributor_modules(&self) -> Vec<ModuleTag> {
        self.modules
            .iter()
            .zip(&self.data)
            .filter(|(_, row)| row.iter().filter(|pct| **pct > 0).count() == 1)
            .map(|(module, _)| *module)
            .collect()
    }
}

/// Split 100 across `counts` by largest remainder, so a row never sums past
/// 100. Leftover points go to the largest fractional parts, earliest first.
fn apportion(counts: &[usize]) -> Vec<u32> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let exact: Vec<f64> = counts
        .iter()
        .map(|count| *count as f64 * 100.0 / total as f64)
        .collect();
    let mut shares: Vec<u32> = exact.iter().map(|pct| pct.floor() as u32).collect();
    let assigned: u32 = shares.iter().sum();

    let mut by_remainder: Vec<usize> = (0..counts.len()).collect();
    by_remainder.sort_by(|a, b| {
        let ra = exact[*a] - exact[*a].floor();
        let rb = exact[*b] - exact[*b].floor();
        rb.total_cmp(&ra).then(a.cmp(b))
    });
    for index in by_remainder.into_iter().take(100u32.saturating_sub(assigned) as usize) {
        shares[index] += 1;
    }
    shares
}

/// Ownership over the commits visible at the view's cutoff.
pub fn bus_factor(view: &AsOfView<'_>) -> BusFactor {
    let ownership = module_ownership(view.commits().iter().copied());
    let ids = view.contributor_ids();

    let data = ownership
        .values()
        .map(|authors| {
            let counts: Vec<usize> = ids
                .iter()
                .map(|id| authors.get(id).copied().unwrap_or(0))
                .collect();
            apportion(&counts)
        })
        .collect();

    BusFactor {
        modules: ownership.keys().copied().collect(),
        contributors: ids.iter().map(|id| view.snapshot.display_name(id)).collect(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::core::{Commit, Member, Snapshot, Team};
    use crate::heuristics::primary_module;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn bus_factor_at_now(snapshot: &Snapshot) -> BusFactor {
        let settings = Settings::default();
        bus_factor(&AsOfView::new(snapshot, &settings, now()))
    }

    fn commit(author: &str, file: &str) -> Commit {
        let files = vec![file.to_string()];
        Commit {
            id: format!("{author}-{file}"),
            author: author.to_string(),
            message: "refactor: split order service into helpers".to_string(),
            date: now() - Duration::hours(26),
            module: primary_module(&files),
            files,
            additions: 1,
            deletions: 1,
            flagged: false,
            honesty_suggestion: None,
        }
    }

    fn member(id: &str) -> Member {
        Member {
            id: id.to_string(),
            name: id.to_string(),
            avatar: String::new(),
            role: String::new(),
            color: String::new(),
        }
    }

    #[test]
    fn test_single_contributor_row_is_exactly_100() {
        let snapshot = Snapshot {
            commits: vec![
                commit("ana", "server/services/orders.js"),
                commit("ana", "server/services/cart.js"),
                commit("ben", "client/pages/Cart.jsx"),
                commit("cy", "client/pages/Home.jsx"),
                commit("cy", "client/pages/About.jsx"),
            ],
            team: Team {
                members: vec![member("ana"), member("ben"), member("cy")],
                deadline: None,
            },
            ..Default::default()
        };
        let bus = bus_factor_at_now(&snapshot);
        assert_eq!(bus.modules, vec![ModuleTag::Backend, ModuleTag::Frontend]);
        assert_eq!(bus.data[0], vec![100, 0, 0]);
        assert_eq!(bus.data[1], vec![0, 33, 67]);
        assert_eq!(bus.single_contributor_modules(), vec![ModuleTag::Backend]);
    }

    #[test]
    fn test_rows_never_exceed_100_for_even_splits() {
        let snapshot = Snapshot {
            commits: vec![
                commit("ana", "api/search.py"),
                commit("ben", "api/search.py"),
            ],
            ..Default::default()
        };
        let bus = bus_factor_at_now(&snapshot);
        for row in &bus.data {
            assert!(row.iter().sum::<u32>() <= 100);
        }
    }

    #[test]
    fn test_apportion_never_overshoots() {
        assert_eq!(apportion(&[1, 3, 4]), vec![13, 37, 50]);
        assert_eq!(apportion(&[1, 1, 1]), vec![34, 33, 33]);
        assert_eq!(apportion(&[0, 0]), vec![0, 0]);
    }

    #[test]
    fn test_future_commits_do_not_dilute_ownership() {
        let mut late = commit("mallory", "server/services/cart.js");
        late.date = now() + Duration::hours(3);
        let snapshot = Snapshot {
            commits: vec![commit("ana", "server/services/orders.js"), late],
            team: Team {
                members: vec![member("ana")],
                deadline: None,
            },
            ..Default::default()
        };

        let bus = bus_factor_at_now(&snapshot);
        assert_eq!(bus.contributors, vec!["ana".to_string()]);
        assert_eq!(bus.data, vec![vec![100]]);
        assert_eq!(bus.single_contributor_modules(), vec![ModuleTag::Backend]);
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(bus_factor_at_now(&Snapshot::default()), BusFactor::default());
    }
}
