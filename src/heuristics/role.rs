use crate::core::ModuleTag;
use std::collections::BTreeMap;

const FULL_STACK_MAX_SHARE: f64 = 0.4;
const FULL_STACK_MIN_MODULES: usize = 3;

pub const DEFAULT_ROLE: &str = "Developer";
pub const FULL_STACK_ROLE: &str = "Full Stack Developer";

fn role_for_module(module: ModuleTag) -> &'static str {
    match module {
        ModuleTag::Frontend => "Frontend Developer",
        ModuleTag::Backend => "Backend Developer",
        ModuleTag::Database => "Database Engineer",
        ModuleTag::Devops => "DevOps Engineer",
        ModuleTag::Auth => "Security Engineer",
        ModuleTag::Testing => "QA Engineer",
        ModuleTag::Messaging => "Realtime Developer",
        ModuleTag::Notifications => "Backend Developer",
        ModuleTag::Search | ModuleTag::Setup => DEFAULT_ROLE,
    }
}

/// Module with the most commits. Ties go to the alphabetically first module.
pub fn dominant_module(histogram: &BTreeMap<ModuleTag, usize>) -> Option<(ModuleTag, usize)> {
    histogram
        .iter()
        .filter(|(_, count)| **count > 0)
        // BTreeMap iterates in name order; `max_by` keeps the last maximum,
        // so compare reversed module order to keep the first one instead.
        .max_by(|(ma, ca), (mb, cb)| ca.cmp(cb).then_with(|| mb.cmp(ma)))
        .map(|(module, count)| (*module, *count))
}

/// Infer a human-readable role from a contributor's per-module commit counts.
pub fn infer_role(histogram: &BTreeMap<ModuleTag, usize>) -> &'static str {
    let total: usize = histogram.values().sum();
    let Some((dominant, dominant_count)) = dominant_module(histogram) else {
        return DEFAULT_ROLE;
    };

    let touched = histogram.values().filter(|count| **count > 0).count();
    let share = dominant_count as f64 / total as f64;
    if share < FULL_STACK_MAX_SHARE && touched >= FULL_STACK_MIN_MODULES {
        return FULL_STACK_ROLE;
    }

    role_for_module(dominant)
}
