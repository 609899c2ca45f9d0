// ABOUTME: Plain-text rendering of the project list, project detail and report views
// ABOUTME: Also prints command responses, either rendered or as JSON envelopes

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::commands::{ExportResult, ProjectDetail, Setting, StoreStatus};
use crate::models::{format_date, DateRange, Entry, ProjectSummary};
use crate::report::Report;
use crate::ApiResponse;

/// Longest description shown in a table cell before it is cut with an ellipsis
const DESCRIPTION_WIDTH: usize = 48;

pub struct ViewOptions {
    /// Decimal places for hours
    pub precision: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self { precision: 1 }
    }
}

impl ViewOptions {
    fn hours(&self, hours: f64) -> String {
        format!("{:.*}", self.precision, hours)
    }
}

/// Print a response. Returns whether it succeeded.
pub fn emit<T: Serialize>(
    response: &ApiResponse<T>,
    json: bool,
    render: impl FnOnce(&T) -> String,
) -> io::Result<bool> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        let body = serde_json::to_string_pretty(response).map_err(io::Error::other)?;
        writeln!(out, "{}", body)?;
        return Ok(response.success);
    }

    if let Some(data) = &response.data {
        let rendered = render(data);
        if !rendered.is_empty() {
            writeln!(out, "{}", rendered)?;
        }
    }
    for message in response.messages.success.iter().chain(&response.messages.info) {
        writeln!(out, "{}", message)?;
    }

    let stderr = io::stderr();
    let mut err = stderr.lock();
    for message in &response.messages.warning {
        writeln!(err, "warning: {}", message)?;
    }
    for message in &response.messages.error {
        writeln!(err, "error: {}", message)?;
    }

    Ok(response.success)
}

/// Left-aligned text table with a header rule
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(table_line(headers.iter().copied(), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(table_line(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn truncate(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() <= max && !text.contains('\n') {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

fn entry_rows(entries: &[Entry], opts: &ViewOptions, with_id: bool) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| {
            let mut row = Vec::with_capacity(4);
            if with_id {
                row.push(e.id.to_string());
            }
            row.push(format_date(e.date));
            row.push(opts.hours(e.hours));
            row.push(truncate(
                e.description.as_deref().unwrap_or(""),
                DESCRIPTION_WIDTH,
            ));
            row
        })
        .collect()
}

pub fn render_project_list(projects: &[ProjectSummary], opts: &ViewOptions) -> String {
    if projects.is_empty() {
        return "No projects yet. Create your first project!".to_string();
    }
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.project.id.to_string(),
                p.project.name.clone(),
                format!("{} entries", p.entry_count),
                format!("Total: {} hours", opts.hours(p.total_hours)),
            ]
        })
        .collect();
    format!("Projects\n\n{}", table(&["ID", "Name", "Entries", "Hours"], &rows))
}

pub fn render_project_detail(detail: &ProjectDetail, opts: &ViewOptions) -> String {
    let header = format!(
        "{}\n{} entries  Total: {} hours",
        detail.project.name,
        detail.entry_count,
        opts.hours(detail.total_hours)
    );
    if detail.entries.is_empty() {
        return format!("{}\n\nNo entries yet", header);
    }
    let rows = entry_rows(&detail.entries, opts, true);
    format!(
        "{}\n\n{}",
        header,
        table(&["ID", "Date", "Hours", "Description"], &rows)
    )
}

pub fn render_entry(entry: &Entry, opts: &ViewOptions) -> String {
    format!(
        "Entry {}: {} {} hours{}",
        entry.id,
        format_date(entry.date),
        opts.hours(entry.hours),
        entry
            .description
            .as_deref()
            .map(|d| format!(" - {}", truncate(d, DESCRIPTION_WIDTH)))
            .unwrap_or_default()
    )
}

fn render_range(range: &DateRange) -> String {
    let bound = |d: Option<chrono::NaiveDate>| d.map(format_date).unwrap_or_else(|| "Any".to_string());
    format!("From: {}  To: {}", bound(range.from), bound(range.to))
}

pub fn render_report(report: &Report, opts: &ViewOptions) -> String {
    let mut out = format!(
        "Report: {}\n{}",
        report.project.name,
        render_range(&report.range)
    );
    if report.is_empty() {
        // The "no entries" notice travels as an info message
        return out;
    }
    out.push_str(&format!(
        "\nTotal Entries: {}  Total Hours: {}\n\n",
        report.entry_count,
        opts.hours(report.total_hours)
    ));
    out.push_str(&table(
        &["Date", "Hours", "Description"],
        &entry_rows(&report.entries, opts, false),
    ));
    out
}

pub fn render_export(result: &ExportResult, opts: &ViewOptions) -> String {
    format!(
        "{} entries, {} hours",
        result.entry_count,
        opts.hours(result.total_hours)
    )
}

pub fn render_settings(settings: &BTreeMap<String, String>) -> String {
    if settings.is_empty() {
        return "No settings stored".to_string();
    }
    settings
        .iter()
        .map(|(k, v)| format!("{} = {}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_setting(setting: &Setting) -> String {
    setting.value.clone()
}

pub fn render_status(status: &StoreStatus) -> String {
    format!(
        "Storage: {}\nDatabase: {}\nProjects: {}\nEntries: {}",
        status.mode,
        status.database.as_deref().unwrap_or("(in memory)"),
        status.projects,
        status.entries
    )
}
