//! Replays a day description and writes the day report.
//!
//! Nothing is written until the whole day has been parsed and processed, so a
//! malformed input produces an error and no partial report.

use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use club_core::{DayReport, parse_day, simulate_day};

use crate::OutputFormat;

/// Runs the simulation for `input` and writes the report to `writer`.
pub fn run<W: Write>(writer: &mut W, input: &Path, format: OutputFormat) -> Result<()> {
    let source = read_input(input)?;
    let day = parse_day(&source)
        .with_context(|| format!("invalid day description in {}", input.display()))?;
    let report = simulate_day(day.config, day.commands)
        .context("failed to process events")?;
    tracing::debug!(
        events = report.events.len(),
        tables = report.tables.len(),
        "day simulated"
    );

    let output = match format {
        OutputFormat::Text => format_text(&report),
        OutputFormat::Json => format_json(&report)?,
    };
    writer.write_all(output.as_bytes())?;
    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read standard input")?;
        return Ok(source);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))
}

/// Formats the report as text: opening time, the event log, closing time,
/// then `id revenue busy` per table.
pub fn format_text(report: &DayReport) -> String {
    let mut output = String::new();

    writeln!(output, "{}", report.open).unwrap();
    for event in &report.events {
        writeln!(output, "{event}").unwrap();
    }
    writeln!(output, "{}", report.close).unwrap();
    for table in &report.tables {
        writeln!(output, "{} {} {}", table.id, table.revenue, table.busy).unwrap();
    }

    output
}

/// Formats the report as pretty-printed JSON.
pub fn format_json(report: &DayReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
