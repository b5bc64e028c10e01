// Export modules for library usage
pub mod cli;
pub mod config;
pub mod core;
pub mod derived;
pub mod errors;
pub mod heuristics;
pub mod ingest;
pub mod io;
pub mod metrics;
pub mod observability;
pub mod report;
pub mod simulation;

// Re-export commonly used types
pub use crate::core::{
    Branch, BranchStatus, Commit, Member, MemberId, MemberRef, ModuleTag, PrStatus, PullRequest,
    Snapshot, Team,
};

pub use crate::config::{RepoPulseConfig, Settings};

pub use crate::errors::{Error, Result, ValidationError};

pub use crate::heuristics::{analyze_honesty, classify, infer_role, HonestyReport, HonestyVerdict};

pub use crate::ingest::{normalize_snapshot, parse_snapshot_json, RawSnapshot};

pub use crate::metrics::{AsOfView, HealthBreakdown, HealthScore, HealthTrend, MetricsEngine};

pub use crate::derived::{build_derived, DerivedSnapshot};

pub use crate::simulation::{find_and_project, project, ProjectionResult};

pub use crate::report::{health_report, HealthReport};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
