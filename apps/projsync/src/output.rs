//! Rendering of convergence reports.

use clap::ValueEnum;

use projsync_engine::{ConvergenceOutcome, ConvergenceReport, OutcomeTag};

use crate::error::CliResult;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table (default)
    #[default]
    Table,
    /// Output as JSON
    Json,
}

/// Check if color output is enabled
pub fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

pub fn render(report: &ConvergenceReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Table => Ok(render_table(report, use_color())),
        OutputFormat::Json => render_json(report),
    }
}

pub fn render_json(report: &ConvergenceReport) -> CliResult<String> {
    let mut value = serde_json::to_value(report)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("summary".to_string(), serde_json::to_value(report.summary())?);
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn render_table(report: &ConvergenceReport, color: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Mode: {}\nSource: {}\nDestination: {}\n\n",
        report.mode, report.source, report.destination
    ));

    if report.outcomes.is_empty() {
        out.push_str("  (nothing to reconcile)\n");
    }

    let kind_width = report
        .outcomes
        .iter()
        .map(|o| o.kind.to_string().len())
        .max()
        .unwrap_or(0);

    for outcome in &report.outcomes {
        out.push_str(&render_row(outcome, kind_width, color));
        out.push('\n');
    }

    let summary = report.summary();
    out.push_str(&format!(
        "\nSummary: {} created, {} updated, {} deleted, {} up-to-date, {} skipped, {} failed\n",
        summary.created,
        summary.updated,
        summary.deleted,
        summary.up_to_date,
        summary.skipped,
        summary.failed
    ));

    if report.cancelled {
        out.push_str("Run cancelled; the report is partial.\n");
    }

    out
}

fn render_row(outcome: &ConvergenceOutcome, kind_width: usize, color: bool) -> String {
    let symbol = outcome.tag.symbol();
    let symbol = if color {
        format!("{}{}\x1b[0m", tag_color(outcome.tag), symbol)
    } else {
        symbol.to_string()
    };

    let mut row = format!(
        "  {} {:<width$}  {}",
        symbol,
        outcome.kind.to_string(),
        outcome.identity(),
        width = kind_width
    );

    if let Some(detail) = &outcome.detail {
        match detail.status {
            Some(status) => row.push_str(&format!("  ({status}: {})", detail.message)),
            None => row.push_str(&format!("  ({})", detail.message)),
        }
    }

    row
}

fn tag_color(tag: OutcomeTag) -> &'static str {
    match tag {
        OutcomeTag::Created => "\x1b[32m",
        OutcomeTag::Updated => "\x1b[33m",
        OutcomeTag::Deleted | OutcomeTag::Failed => "\x1b[31m",
        OutcomeTag::UpToDate | OutcomeTag::Skipped => "\x1b[2m",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projsync_engine::{OutcomeDetail, ResourceKind, SweepMode};

    fn report() -> ConvergenceReport {
        let mut report = ConvergenceReport::new(SweepMode::Create, "https://a/", "https://b/");
        report.record(ConvergenceOutcome::new(
            ResourceKind::Project,
            "acme",
            None,
            OutcomeTag::Created,
        ));
        report.record(
            ConvergenceOutcome::new(
                ResourceKind::UserBinding,
                "acme",
                Some("bob"),
                OutcomeTag::Failed,
            )
            .with_detail(OutcomeDetail {
                status: Some(500),
                message: "boom".into(),
            }),
        );
        report
    }

    #[test]
    fn test_table_lists_each_outcome() {
        let table = render_table(&report(), false);
        assert!(table.contains("Mode: create"));
        assert!(table.contains("+ project  acme"));
        assert!(table.contains("✗ user     acme/bob  (500: boom)"));
        assert!(table.contains("1 created"));
        assert!(table.contains("1 failed"));
        assert!(!table.contains("\x1b["));
    }

    #[test]
    fn test_table_marks_cancelled_runs() {
        let mut report = ConvergenceReport::new(SweepMode::Delete, "a", "b");
        report.mark_cancelled();
        let table = render_table(&report, false);
        assert!(table.contains("nothing to reconcile"));
        assert!(table.contains("partial"));
    }

    #[test]
    fn test_json_includes_summary() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["created"], 1);
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["outcomes"][1]["name"], "bob");
    }
}
