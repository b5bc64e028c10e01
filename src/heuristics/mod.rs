//! Leaf heuristics with no dependencies on snapshot state: path
//! classification, commit message honesty, role inference and the
//! pull request / branch lifecycle rules.

pub mod honesty;
pub mod lifecycle;
pub mod module_classifier;
pub mod role;

use crate::core::{Commit, ModuleTag};
use std::collections::BTreeMap;

pub use honesty::{analyze_honesty, HonestyReport, HonestyVerdict};
pub use module_classifier::{classify, classify_files, primary_module, substantive_modules};
pub use role::infer_role;

/// Per-module commit counts, keyed by each commit's primary module.
pub fn module_histogram<'a>(
    commits: impl IntoIterator<Item = &'a Commit>,
) -> BTreeMap<ModuleTag, usize> {
    commits.into_iter().fold(BTreeMap::new(), |mut acc, commit| {
        *acc.entry(commit.module).or_insert(0) += 1;
        acc
    })
}
