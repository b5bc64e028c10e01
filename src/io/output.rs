use crate::derived::{
    ActivityStatus, Blocker, BusFactor, CommitHonesty, GhostingAlert, IntegrationRisk,
    IntegrationStatus, MemberActivity, Severity, SimulationScenario,
};
use crate::heuristics::HonestyVerdict;
use crate::report::HealthReport;
use crate::simulation::ProjectionResult;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;

/// Days of trend and velocity shown in terminal output
const RECENT_DAYS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl OutputFormat {
    /// Parse the `default_format` value from `.repopulse.toml`.
    pub fn from_config(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "terminal" => Some(Self::Terminal),
            _ => None,
        }
    }
}

/// Every document the CLI can emit. Serializes as the bare inner value, so
/// JSON output matches the dashboard API bodies.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Document<'a> {
    Health(&'a HealthReport),
    Blockers(&'a [Blocker]),
    Integration(&'a [IntegrationRisk]),
    BusFactor(&'a BusFactor),
    Scenarios(&'a [SimulationScenario]),
    Honesty(&'a [CommitHonesty]),
    Ghosting(&'a [GhostingAlert]),
    Activity(&'a [MemberActivity]),
    Projection(&'a ProjectionResult),
}

pub trait OutputWriter {
    fn write_document(&mut self, document: &Document<'_>) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_document(&mut self, document: &Document<'_>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    use_color: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, use_color: bool) -> Self {
        Self { writer, use_color }
    }

    fn table(&self, header: Vec<&str>) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);
        if self.use_color {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }

    fn heading(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", title.bold().blue())?;
        writeln!(self.writer, "{}", "=".repeat(title.chars().count()).blue())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_table(&mut self, table: &Table) -> anyhow::Result<()> {
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_health(&mut self, report: &HealthReport) -> anyhow::Result<()> {
        let health = &report.health_score;
        self.heading("Project Health")?;
        writeln!(
            self.writer,
            "  Overall: {} / 100",
            colored_score(health.overall)
        )?;
        writeln!(self.writer)?;

        let mut breakdown = self.table(vec!["Component", "Risk"]);
        for (name, risk) in [
            ("Delivery", health.breakdown.delivery_risk),
            ("Integration", health.breakdown.integration_risk),
            ("Stability", health.breakdown.stability_risk),
        ] {
            breakdown.add_row(vec![Cell::new(name), risk_cell(risk)]);
        }
        self.print_table(&breakdown)?;

        if let Some(message) = &health.message {
            writeln!(self.writer, "  {}", message.dimmed())?;
            writeln!(self.writer)?;
        }

        if !health.trend.is_empty() {
            let mut trend = self.table(vec!["Date", "Health"]);
            let skip = health.trend.len().saturating_sub(RECENT_DAYS);
            for point in health.trend.iter().skip(skip) {
                trend.add_row(vec![Cell::new(point.date), health_cell(point.score)]);
            }
            self.print_table(&trend)?;
        }

        if let Some(first) = report.velocity.first() {
            let names: Vec<&str> = first.counts.keys().map(String::as_str).collect();
            let mut header = vec!["Date"];
            header.extend(names.iter().copied());
            let mut velocity = self.table(header);
            let skip = report.velocity.len().saturating_sub(RECENT_DAYS);
            for row in report.velocity.iter().skip(skip) {
                let mut cells = vec![Cell::new(row.date)];
                cells.extend(
                    names
                        .iter()
                        .map(|name| Cell::new(row.counts.get(*name).copied().unwrap_or(0))),
                );
                velocity.add_row(cells);
            }
            self.print_table(&velocity)?;
        }

        if !report.contributions.is_empty() {
            let mut contributions =
                self.table(vec!["Contributor", "Commits", "Additions", "Deletions", "Share"]);
            for stat in &report.contributions {
                contributions.add_row(vec![
                    Cell::new(&stat.name),
                    Cell::new(stat.commits),
                    Cell::new(format!("+{}", stat.additions)).fg(Color::Green),
                    Cell::new(format!("-{}", stat.deletions)).fg(Color::Red),
                    Cell::new(format!("{}%", stat.percentage)),
                ]);
            }
            self.print_table(&contributions)?;
        }
        Ok(())
    }

    fn write_blockers(&mut self, blockers: &[Blocker]) -> anyhow::Result<()> {
        self.heading("Blockers")?;
        if blockers.is_empty() {
            writeln!(self.writer, "  {}", "No blockers detected.".green())?;
            return Ok(());
        }
        let mut table = self.table(vec!["Severity", "Type", "Title", "Owner", "Modules"]);
        for blocker in blockers {
            table.add_row(vec![
                severity_cell(blocker.severity),
                Cell::new(blocker.kind.as_str()),
                Cell::new(&blocker.title),
                Cell::new(&blocker.owner),
                Cell::new(join_modules(&blocker.affected_modules)),
            ]);
        }
        self.print_table(&table)
    }

    fn write_integration(&mut self, risks: &[IntegrationRisk]) -> anyhow::Result<()> {
        self.heading("Integration Risk")?;
        let mut table = self.table(vec!["Module", "Risk", "Status", "Dependencies"]);
        for risk in risks {
            let color = match risk.status {
                IntegrationStatus::Isolated => Color::Red,
                IntegrationStatus::AtRisk => Color::Yellow,
                IntegrationStatus::Partial => Color::Cyan,
                IntegrationStatus::Integrated => Color::Green,
            };
            table.add_row(vec![
                Cell::new(risk.module),
                Cell::new(risk.risk),
                Cell::new(risk.status.as_str()).fg(color),
                Cell::new(join_modules(&risk.dependencies)),
            ]);
        }
        self.print_table(&table)
    }

    fn write_bus_factor(&mut self, bus: &BusFactor) -> anyhow::Result<()> {
        self.heading("Bus Factor")?;
        let mut header = vec!["Module"];
        header.extend(bus.contributors.iter().map(String::as_str));
        let mut table = self.table(header);
        for (module, row) in bus.modules.iter().zip(&bus.data) {
            let mut cells = vec![Cell::new(module)];
            cells.extend(row.iter().map(|pct| {
                let cell = Cell::new(format!("{pct}%"));
                if *pct == 100 {
                    cell.fg(Color::Red)
                } else {
                    cell
                }
            }));
            table.add_row(cells);
        }
        self.print_table(&table)
    }

    fn write_scenarios(&mut self, scenarios: &[SimulationScenario]) -> anyhow::Result<()> {
        self.heading("Simulation Scenarios")?;
        let mut table = self.table(vec!["Id", "Scenario", "Health", "Blockers", "Modules"]);
        for scenario in scenarios {
            let drop = scenario.impact.health_drop;
            let color = if drop < 0 { Color::Red } else { Color::Green };
            table.add_row(vec![
                Cell::new(&scenario.id),
                Cell::new(&scenario.name),
                Cell::new(format!("{drop:+}")).fg(color),
                Cell::new(format!("{:+}", scenario.impact.new_blockers)),
                Cell::new(join_modules(&scenario.impact.affected_modules)),
            ]);
        }
        self.print_table(&table)
    }

    fn write_honesty(&mut self, listing: &[CommitHonesty]) -> anyhow::Result<()> {
        self.heading("Commit Honesty")?;
        let mut table = self.table(vec!["Commit", "Author", "Score", "Message", "Suggestion"]);
        for entry in listing {
            let verdict_color = match entry.verdict {
                HonestyVerdict::Honest => Color::Green,
                HonestyVerdict::Misleading => Color::Red,
            };
            table.add_row(vec![
                Cell::new(short_id(&entry.commit_id)),
                Cell::new(&entry.author),
                Cell::new(entry.match_score).fg(verdict_color),
                Cell::new(&entry.message),
                Cell::new(entry.suggestion.as_deref().unwrap_or("")),
            ]);
        }
        self.print_table(&table)
    }

    fn write_ghosting(&mut self, alerts: &[GhostingAlert]) -> anyhow::Result<()> {
        self.heading("Ghosting")?;
        if alerts.is_empty() {
            writeln!(self.writer, "  {}", "Everyone has committed recently.".green())?;
            return Ok(());
        }
        let mut table = self.table(vec!["Member", "Last commit", "Days inactive"]);
        for alert in alerts {
            table.add_row(vec![
                Cell::new(&alert.name),
                Cell::new(alert.last_commit.format("%Y-%m-%d %H:%M")),
                Cell::new(alert.days_inactive).fg(Color::Red),
            ]);
        }
        self.print_table(&table)
    }

    fn write_activity(&mut self, activity: &[MemberActivity]) -> anyhow::Result<()> {
        self.heading("Team Activity")?;
        let mut table = self.table(vec![
            "Member",
            "Status",
            "Last commit",
            "Open PRs",
            "Active branches",
            "Module",
        ]);
        for member in activity {
            let color = match member.status {
                ActivityStatus::Active => Color::Green,
                ActivityStatus::Idle => Color::Yellow,
                ActivityStatus::Inactive => Color::Red,
                ActivityStatus::NoActivity => Color::DarkGrey,
            };
            table.add_row(vec![
                Cell::new(&member.name),
                Cell::new(member.status.as_str()).fg(color),
                Cell::new(
                    member
                        .last_commit
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(member.open_pull_requests),
                Cell::new(member.active_branches),
                Cell::new(
                    member
                        .current_module
                        .map(|m| m.as_str())
                        .unwrap_or("-"),
                ),
            ]);
        }
        self.print_table(&table)
    }

    fn write_projection(&mut self, projection: &ProjectionResult) -> anyhow::Result<()> {
        self.heading(&format!("Simulation: {}", projection.scenario_name))?;
        writeln!(
            self.writer,
            "  Health: {} -> {} ({:+})",
            colored_score(projection.current_health),
            colored_score(projection.projected_health),
            projection.health_change
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Analysis".bold())?;
        for line in &projection.analysis {
            writeln!(self.writer, "  - {line}")?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Recommendations".bold())?;
        for (i, line) in projection.recommendations.iter().enumerate() {
            writeln!(self.writer, "  {}. {line}", i + 1)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_document(&mut self, document: &Document<'_>) -> anyhow::Result<()> {
        match document {
            Document::Health(report) => self.write_health(report),
            Document::Blockers(blockers) => self.write_blockers(blockers),
            Document::Integration(risks) => self.write_integration(risks),
            Document::BusFactor(bus) => self.write_bus_factor(bus),
            Document::Scenarios(scenarios) => self.write_scenarios(scenarios),
            Document::Honesty(listing) => self.write_honesty(listing),
            Document::Ghosting(alerts) => self.write_ghosting(alerts),
            Document::Activity(activity) => self.write_activity(activity),
            Document::Projection(projection) => self.write_projection(projection),
        }
    }
}

fn colored_score(score: u32) -> ColoredString {
    let text = score.to_string();
    match score {
        70.. => text.green().bold(),
        40..=69 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

fn health_cell(score: u32) -> Cell {
    let color = match score {
        70.. => Color::Green,
        40..=69 => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(score).fg(color)
}

fn risk_cell(risk: u32) -> Cell {
    let color = match risk {
        0..=20 => Color::Green,
        21..=50 => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(risk).fg(color)
}

fn severity_cell(severity: Severity) -> Cell {
    let (label, color) = match severity {
        Severity::Critical => ("critical", Color::Red),
        Severity::High => ("high", Color::Magenta),
        Severity::Medium => ("medium", Color::Yellow),
        Severity::Low => ("low", Color::Cyan),
    };
    Cell::new(label).fg(color)
}

fn join_modules(modules: &[crate::core::ModuleTag]) -> String {
    modules
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}

/// Writer for `format`, targeting stdout.
pub fn create_writer(format: OutputFormat, use_color: bool) -> Box<dyn OutputWriter> {
    colored::control::set_override(use_color);
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(std::io::stdout(), use_color)),
    }
}
