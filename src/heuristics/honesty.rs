//! Commit message honesty scoring.
//!
//! Scores how well a commit message describes the change it ships. The
//! analysis is a pure function of the message and the touched file list,
//! so identical inputs always produce identical reports.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Messages that say nothing about the change, compared after normalization.
const VAGUE_MESSAGES: &[&str] = &[
    "fix",
    "fixes",
    "fixed",
    "done",
    "wip",
    "update",
    "updates",
    "updated",
    "cleanup",
    "clean up",
    ".",
    "..",
    "...",
    "initial commit",
    "save",
    "changes",
    "minor",
    "misc",
    "stuff",
    "temp",
    "tmp",
    "test",
    "commit",
];

const MIN_DESCRIPTIVE_LENGTH: usize = 8;

const VAGUE_FLOOR: i64 = 5;
const VAGUE_CEILING: i64 = 30;
const HONEST_FLOOR: i64 = 65;
const HONEST_CEILING: i64 = 98;
const HONEST_BASE: i64 = 70;
const FILE_MENTION_BONUS: i64 = 8;
const CONVENTIONAL_BONUS: i64 = 5;

static CONVENTIONAL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(feat|fix|chore|docs|style|refactor|test|ci)\b").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HonestyVerdict {
    Honest,
    Misleading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HonestyReport {
    /// 5..=30 for misleading messages, 65..=98 for honest ones
    pub match_score: u32,
    pub verdict: HonestyVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl HonestyReport {
    pub fn is_misleading(&self) -> bool {
        self.verdict == HonestyVerdict::Misleading
    }
}

/// Lowercase, trim and drop trailing `.`/`!` unless the message is only
/// punctuation (so `"."` itself stays comparable).
fn normalize_message(message: &str) -> String {
    let lowered = message.trim().to_lowercase();
    let stripped = lowered.trim_end_matches(['.', '!']).trim_end();
    if stripped.is_empty() {
        lowered
    } else {
        stripped.to_string()
    }
}

pub fn is_vague(message: &str) -> bool {
    let trimmed = message.trim();
    if trimmed.chars().count() < MIN_DESCRIPTIVE_LENGTH {
        return true;
    }
    let normalized = normalize_message(trimmed);
    VAGUE_MESSAGES.contains(&normalized.as_str())
}

fn file_name(path: &str) -> &str {
    let normalized = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if normalized.is_empty() {
        path
    } else {
        normalized
    }
}

/// True when any touched file's name or stem (3+ chars) appears in the message.
fn mentions_touched_file(message: &str, files: &[String]) -> bool {
    let lowered = message.to_lowercase();
    files.iter().any(|path| {
        let name = file_name(path).to_lowercase();
        let stem = Path::new(&name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&name)
            .to_string();
        (!name.is_empty() && lowered.contains(&name))
            || (stem.chars().count() >= 3 && lowered.contains(&stem))
    })
}

fn suggestion_for(message: &str, files: &[String]) -> String {
    let named: Vec<&str> = files.iter().take(2).map(|f| file_name(f)).collect();
    let trimmed = message.trim();
    match named.as_slice() {
        [] => format!(
            "Describe what changed and why instead of \"{}\".",
            trimmed
        ),
        [only] => format!("Describe the change made to {} and why it was needed.", only),
        [first, second, ..] => format!(
            "Describe the changes made to {} and {} and why they were needed.",
            first, second
        ),
    }
}

/// Score how honestly `message` describes a commit touching `files`.
pub fn analyze_honesty(message: &str, files: &[String]) -> HonestyReport {
    if is_vague(message) {
        let length_factor = (message.trim().chars().count() as i64).min(15);
        let file_factor = (files.len() as i64 * 2).min(10);
        let score = (VAGUE_FLOOR + length_factor + file_factor).clamp(VAGUE_FLOOR, VAGUE_CEILING);
        return HonestyReport {
            match_score: score as u32,
            verdict: HonestyVerdict::Misleading,
            suggestion: Some(suggestion_for(message, files)),
        };
    }

    let words = message.split_whitespace().count() as i64;
    let word_factor = (words - 3).clamp(0, 10);
    let mention_bonus = if mentions_touched_file(message, files) {
        FILE_MENTION_BONUS
    } else {
        0
    };
    let conventional_bonus = if CONVENTIONAL_PREFIX.is_match(message.trim()) {
        CONVENTIONAL_BONUS
    } else {
        0
    };

    let score = (HONEST_BASE + word_factor + mention_bonus + conventional_bonus)
        .clamp(HONEST_FLOOR, HONEST_CEILING);

    HonestyReport {
        match_score: score as u32,
        verdict: HonestyVerdict::Honest,
        suggestion: None,
    }
}
