//! Thread-local context tracking for crash reports.
//!
//! Records which pipeline phase is running and which snapshot file is being
//! processed, so the panic hook can say what repopulse was doing. Context
//! guards use RAII and restore the previous context on drop.

use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CURRENT_CONTEXT: RefCell<PipelineContext> = const { RefCell::new(PipelineContext::new()) };
}

/// What repopulse was doing when something went wrong.
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    pub phase: Option<PipelinePhase>,
    /// Snapshot file being processed
    pub snapshot: Option<PathBuf>,
    /// Command being run (`health`, `blockers`, ...)
    pub command: Option<String>,
}

impl PipelineContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            snapshot: None,
            command: None,
        }
    }
}

/// Major stages of a repopulse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    /// Loading `.repopulse.toml`
    Configuration,
    /// Reading and validating the raw snapshot
    Ingest,
    /// Building blockers, risks and scenarios
    Derivation,
    /// Live health, trend and velocity
    Metrics,
    /// Projecting a what-if scenario
    Simulation,
    OutputGeneration,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Ingest => write!(f, "ingest"),
            Self::Derivation => write!(f, "derivation"),
            Self::Metrics => write!(f, "metrics"),
            Self::Simulation => write!(f, "simulation"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: PipelineContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut PipelineContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current phase; the previous phase is restored when the guard drops.
#[must_use]
pub fn set_phase(phase: PipelinePhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_snapshot(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.snapshot = Some(path))
}

#[must_use]
pub fn set_current_command(command: impl Into<String>) -> ContextGuard {
    let command = command.into();
    update(|ctx| ctx.command = Some(command))
}

/// Called by the panic hook.
#[must_use]
pub fn get_current_context() -> PipelineContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = PipelineContext::new();
    });
}
