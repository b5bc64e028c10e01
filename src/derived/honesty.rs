use crate::core::Snapshot;
use crate::heuristics::{analyze_honesty, HonestyVerdict};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHonesty {
    pub commit_id: String,
    pub author: String,
    pub message: String,
    pub match_score: u32,
    pub verdict: HonestyVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Honesty verdict for every commit, newest first.
pub fn honesty_listing(snapshot: &Snapshot) -> Vec<CommitHonesty> {
    let mut commits: Vec<_> = snapshot.commits.iter().collect();
    commits.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    commits
        .into_iter()
        .map(|commit| {
            let report = analyze_honesty(&commit.message, &commit.files);
            CommitHonesty {
                commit_id: commit.id.clone(),
                author: snapshot.display_name(&commit.author),
                message: commit.message.clone(),
                match_score: report.match_score,
                verdict: report.verdict,
                suggestion: report.suggestion,
            }
        })
        .collect()
}
