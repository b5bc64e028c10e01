//! File path to module classification.
//!
//! Rules are an explicit ordered list evaluated top to bottom; the first
//! matching pattern wins. Specific concerns (auth, devops, database, ...)
//! come before the coarse directory-prefix rules for frontend and backend,
//! so `src/controllers/auth.controller.js` is `auth`, not `backend`.

use crate::core::ModuleTag;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

struct ModuleRule {
    pattern: Regex,
    tag: ModuleTag,
}

fn rule(pattern: &str, tag: ModuleTag) -> ModuleRule {
    ModuleRule {
        // Patterns are compile-time constants covered by tests
        pattern: Regex::new(&format!("(?i){pattern}")).unwrap(),
        tag,
    }
}

static MODULE_RULES: Lazy<Vec<ModuleRule>> = Lazy::new(|| {
    vec![
        rule(
            r"auth|login|logout|signup|sign-up|register|session|jwt|oauth|passport|password|credential",
            ModuleTag::Auth,
        ),
        rule(
            r"dockerfile|docker-compose|\.dockerignore|\.github/|(^|/)ci/|\.gitlab-ci|jenkinsfile|k8s|kubernetes|helm|terraform|deploy|nginx|procfile|vercel\.json|netlify\.toml",
            ModuleTag::Devops,
        ),
        rule(
            r"(^|/)(models?|migrations?|seeds?|seeders|schemas?|db|database|prisma)(/|\.|$)|schema\.|\.sql$|sequelize|mongoose|knexfile",
            ModuleTag::Database,
        ),
        rule(
            r"socket|websocket|(^|/)chat|messag|pubsub|kafka|rabbitmq|realtime|real-time",
            ModuleTag::Messaging,
        ),
        rule(r"search|elastic|algolia|meili|indexer", ModuleTag::Search),
        rule(
            r"notif|email|mailer|(^|/)mail|sms|push|webhook|discord|slack",
            ModuleTag::Notifications,
        ),
        rule(
            r"(^|/)(tests?|__tests__|spec|e2e|cypress)/|\.(test|spec)\.|_test\.|(^|/)test_|jest\.config|vitest",
            ModuleTag::Testing,
        ),
        rule(
            r"(^|/)(client|frontend|web|ui|components?|pages|views|public|styles?|assets|hooks)/|\.(jsx|tsx|vue|svelte|css|scss|sass|less|html)$",
            ModuleTag::Frontend,
        ),
        rule(
            r"(^|/)(server|backend|api|controllers?|routes?|services?|middlewares?|handlers?|lib)/|\.(py|go|rb|java|rs|php)$",
            ModuleTag::Backend,
        ),
    ]
});

/// Classify a file path into a module tag. Total: unmatched paths are `setup`.
pub fn classify(file_path: &str) -> ModuleTag {
    let normalized = file_path.replace('\\', "/");
    MODULE_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(&normalized))
        .map(|rule| rule.tag)
        .unwrap_or(ModuleTag::Setup)
}

/// Module of the first touched file, `setup` when nothing was touched.
pub fn primary_module(files: &[String]) -> ModuleTag {
    files
        .first()
        .map(|f| classify(f))
        .unwrap_or(ModuleTag::Setup)
}

/// Every distinct module touched by a set of files.
///
/// An empty file list still touches `setup`, so every commit belongs to
/// at least one module.
pub fn classify_files(files: &[String]) -> BTreeSet<ModuleTag> {
    if files.is_empty() {
        return BTreeSet::from([ModuleTag::Setup]);
    }
    files.iter().map(|f| classify(f)).collect()
}

/// Distinct modules excluding the `setup` catch-all.
pub fn substantive_modules(files: &[String]) -> BTreeSet<ModuleTag> {
    files
        .iter()
        .map(|f| classify(f))
        .filter(|m| !m.is_trivial())
        .collect()
}
