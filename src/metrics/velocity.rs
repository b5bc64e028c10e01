use crate::core::time::days_inclusive;
use crate::core::Snapshot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Commits per contributor on one day, keyed by column label.
///
/// A label is the contributor's display name, or `"name (id)"` when two
/// contributors share that name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelocityRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: BTreeMap<String, u32>,
}

/// One unique column label per contributor id, in contributor order.
fn column_labels(snapshot: &Snapshot) -> Vec<(String, String)> {
    let ids = snapshot.contributor_ids();
    let names: Vec<String> = ids.iter().map(|id| snapshot.display_name(id)).collect();

    let mut uses: HashMap<&str, usize> = HashMap::new();
    for name in &names {
        *uses.entry(name.as_str()).or_insert(0) += 1;
    }

    ids.iter()
        .zip(&names)
        .map(|(id, name)| {
            let label = if uses[name.as_str()] > 1 {
                format!("{name} ({id})")
            } else {
                name.clone()
            };
            (id.clone(), label)
        })
        .collect()
}

/// Every day from the first commit through `now`, every contributor in
/// every row (zero when they did not commit that day).
pub fn velocity(snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<VelocityRow> {
    let Some(first) = snapshot.first_commit_date() else {
        return Vec::new();
    };

    let labels = column_labels(snapshot);

    let mut per_day: BTreeMap<NaiveDate, HashMap<&str, u32>> = BTreeMap::new();
    for commit in &snapshot.commits {
        *per_day
            .entry(commit.date.date_naive())
            .or_default()
            .entry(commit.author.as_str())
            .or_insert(0) += 1;
    }

    days_inclusive(first.date_naive(), now.date_naive())
        .map(|date| {
            let day = per_day.get(&date);
            let counts = labels
                .iter()
                .map(|(id, label)| {
                    let count = day.and_then(|d| d.get(id.as_str())).copied().unwrap_or(0);
                    (label.clone(), count)
                })
                .collect();
            VelocityRow { date, counts }
        })
        .collect()
}
