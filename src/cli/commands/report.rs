//! Handler for every subcommand that reads a snapshot and emits a document.

use crate::cli::args::Commands;
use crate::cli::setup::Session;
use crate::core::Snapshot;
use crate::derived::build_derived;
use crate::io::{self, create_writer, Document, OutputWriter};
use crate::metrics::MetricsEngine;
use crate::observability::{set_current_snapshot, set_phase, PipelinePhase};
use crate::report::health_report;
use crate::simulation::find_and_project;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub fn handle_report_command(command: &Commands, session: &Session) -> Result<()> {
    let path = session.snapshot_path()?;
    let _snapshot = set_current_snapshot(path);

    let snapshot = load(path, session)?;
    let mut writer = create_writer(session.format, session.use_color);
    render(command, &snapshot, session, writer.as_mut())
}

fn load(path: &Path, session: &Session) -> Result<Snapshot> {
    let _phase = set_phase(PipelinePhase::Ingest);

    let snapshot = io::read_snapshot(path, session.now, &session.settings)?;
    info!(
        commits = snapshot.commits.len(),
        pull_requests = snapshot.pull_requests.len(),
        branches = snapshot.branches.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Compute the document for `command` and hand it to `writer`.
pub fn render(
    command: &Commands,
    snapshot: &Snapshot,
    session: &Session,
    writer: &mut dyn OutputWriter,
) -> Result<()> {
    if *command == Commands::Health {
        let report = {
            let _phase = set_phase(PipelinePhase::Metrics);
            health_report(&MetricsEngine::new(snapshot, &session.settings, session.now))
        };
        let _phase = set_phase(PipelinePhase::OutputGeneration);
        return writer.write_document(&Document::Health(&report));
    }

    let derived = {
        let _phase = set_phase(PipelinePhase::Derivation);
        build_derived(snapshot, session.now, &session.settings)
    };

    let projection = match command {
        Commands::Simulate { scenario_id } => {
            let _phase = set_phase(PipelinePhase::Simulation);
            Some(
                find_and_project(&derived, scenario_id, &derived.health)
                    .with_context(|| format!("Cannot simulate {scenario_id}"))?,
            )
        }
        _ => None,
    };

    let document = match (command, projection.as_ref()) {
        (Commands::Simulate { .. }, Some(projection)) => Document::Projection(projection),
        (Commands::Blockers, _) => Document::Blockers(&derived.blockers),
        (Commands::Integration, _) => Document::Integration(&derived.integration),
        (Commands::BusFactor, _) => Document::BusFactor(&derived.bus_factor),
        (Commands::Simulation, _) => Document::Scenarios(&derived.scenarios),
        (Commands::Honesty, _) => Document::Honesty(&derived.honesty),
        (Commands::Ghosting, _) => Document::Ghosting(&derived.ghosting),
        (Commands::Activity, _) => Document::Activity(&derived.activity),
        (other, _) => anyhow::bail!("{} does not produce a report", other.name()),
    };

    let _phase = set_phase(PipelinePhase::OutputGeneration);
    writer.write_document(&document)
}
