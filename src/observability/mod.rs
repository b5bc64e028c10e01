//! Observability: log setup, pipeline context and crash reports.
//!
//! ```ignore
//! use repopulse::observability::{install_panic_hook, set_phase, PipelinePhase};
//!
//! install_panic_hook();
//! let _phase = set_phase(PipelinePhase::Ingest);
//! // a panic here reports the ingest phase
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, reset_context, set_current_command, set_current_snapshot, set_phase,
    ContextGuard, PipelineContext, PipelinePhase,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::init_tracing;
