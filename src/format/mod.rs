//! Output formatting for flow reports (table, JSON, markdown).

use crate::commands::FlowReport;
use crate::config::OutputFormat;

/// Formats flow reports for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a complete flow report.
    pub fn format_report(&self, report: &FlowReport) -> String {
        match self.format {
            OutputFormat::Json => self.json(report),
            OutputFormat::Table => self.table(report),
            OutputFormat::Markdown => self.markdown(report),
        }
    }

    fn json(&self, report: &FlowReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn table(&self, report: &FlowReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Query:     {}", report.query));
        lines.push(format!("Target:    {} ({}, {})", report.base_url, report.locale, report.device));
        lines.push(format!(
            "Load:      {:.2}s ({})",
            report.load_seconds,
            if report.settled { "settled" } else { "best-effort" }
        ));

        if let Some(relevance) = report.relevance {
            lines.push(format!("Relevance: {:.0}%", relevance * 100.0));
        }
        lines.push(format!("Columns:   {}", report.columns));

        lines.push(String::new());
        lines.push(format!(
            "{:<6} {:>6} {:>9} {:>7} {:>9} {:>10} {:>9}",
            "Page", "Tiles", "Parsed", "Missing", "Malformed", "Average", "Currency"
        ));
        lines.push(format!(
            "{:-<6} {:-<6} {:-<9} {:-<7} {:-<9} {:-<10} {:-<9}",
            "", "", "", "", "", "", ""
        ));

        for page in &report.pages {
            let average = page
                .price
                .average()
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "N/A".to_string());
            lines.push(format!(
                "{:<6} {:>6} {:>9} {:>7} {:>9} {:>10} {:>8.0}%",
                page.page,
                page.tiles,
                page.price.values.len(),
                page.price.missing,
                page.price.malformed.len(),
                average,
                page.currency_ratio * 100.0
            ));
        }

        if !report.console_errors.is_empty() {
            lines.push(String::new());
            lines.push(format!("Console errors ({}):", report.console_errors.len()));
            for error in &report.console_errors {
                lines.push(format!("  {}", error));
            }
        }

        if !report.network_failures.is_empty() {
            lines.push(String::new());
            lines.push(format!("Failed requests ({}):", report.network_failures.len()));
            for failure in &report.network_failures {
                lines.push(format!("  {}", failure));
            }
        }

        lines.push(String::new());
        lines.push(format!("Verdict:   {}", if report.healthy() { "HEALTHY" } else { "DEGRADED" }));

        lines.join("\n")
    }

    fn markdown(&self, report: &FlowReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## Search flow: {}", report.query));
        lines.push(String::new());
        lines.push(format!("- Target: `{}` ({}, {})", report.base_url, report.locale, report.device));
        lines.push(format!(
            "- Load: {:.2}s ({})",
            report.load_seconds,
            if report.settled { "settled" } else { "best-effort" }
        ));
        if let Some(relevance) = report.relevance {
            lines.push(format!("- Relevance: {:.0}%", relevance * 100.0));
        }
        lines.push(format!("- Columns: {}", report.columns));
        lines.push(format!(
            "- Verdict: **{}**",
            if report.healthy() { "healthy" } else { "degraded" }
        ));
        lines.push(String::new());

        lines.push("| Page | Tiles | Parsed | Missing | Malformed | Average | Currency |".to_string());
        lines.push("|------|-------|--------|---------|-----------|---------|----------|".to_string());
        for page in &report.pages {
            let average = page
                .price
                .average()
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "N/A".to_string());
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} | {:.0}% |",
                page.page,
                page.tiles,
                page.price.values.len(),
                page.price.missing,
                page.price.malformed.len(),
                average,
                page.currency_ratio * 100.0
            ));
        }

        for error in &report.console_errors {
            lines.push(format!("- Console: `{}`", error));
        }
        for failure in &report.network_failures {
            lines.push(format!("- Request: `{}`", failure));
        }

        lines.join("\n")
    }
}
