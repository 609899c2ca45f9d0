// ABOUTME: Spreadsheet export for Time Tracker reports
// ABOUTME: Writes a report's entries and total hours to an .xlsx workbook

use rust_xlsxwriter::{Format, FormatBorder, Workbook};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::format_date;
use crate::report::Report;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("No entries found for the selected criteria")]
    EmptyReport,
    #[error("No directory available to save the report in")]
    NoDirFound,
}

const SHEET_NAME: &str = "Report";
const HOURS_FORMAT: &str = "0.00";

/// Write `report` to `path`, creating parent directories as needed
pub fn export_report_xlsx(report: &Report, path: &Path) -> Result<(), ExportError> {
    if report.is_empty() {
        return Err(ExportError::EmptyReport);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let header = Format::new()
        .set_bold()
        .set_border_bottom(FormatBorder::Thin);
    let hours = Format::new().set_num_format(HOURS_FORMAT);
    let total = Format::new().set_bold().set_num_format(HOURS_FORMAT);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    worksheet.set_column_width(0, 12)?;
    worksheet.set_column_width(1, 8)?;
    worksheet.set_column_width(2, 60)?;

    worksheet.write_string_with_format(0, 0, "Date", &header)?;
    worksheet.write_string_with_format(0, 1, "Hours", &header)?;
    worksheet.write_string_with_format(0, 2, "Description", &header)?;

    let mut row: u32 = 1;
    for entry in &report.entries {
        worksheet.write_string(row, 0, format_date(entry.date))?;
        worksheet.write_number_with_format(row, 1, entry.hours, &hours)?;
        worksheet.write_string(row, 2, entry.description.as_deref().unwrap_or(""))?;
        row += 1;
    }

    // Blank spacer row, then the summary
    row += 1;
    worksheet.write_string_with_format(row, 0, "Total", &header)?;
    worksheet.write_number_with_format(row, 1, report.total_hours, &total)?;

    workbook.save(path)?;
    log::info!(
        "Exported {} entries for '{}' to {}",
        report.entry_count,
        report.project.name,
        path.display()
    );
    Ok(())
}

/// Pick the destination for an export: the explicit path if given, otherwise
/// `file_name` inside the first available directory.
pub fn resolve_output_path(
    explicit: Option<PathBuf>,
    directories: &[Option<PathBuf>],
    file_name: &str,
) -> Result<PathBuf, ExportError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    directories
        .iter()
        .flatten()
        .next()
        .map(|dir| dir.join(file_name))
        .ok_or(ExportError::NoDirFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TrackerStore;
    use crate::models::{parse_date, DateRange, EntryInput};

    fn report_with_entries(count: usize) -> Report {
        let store = TrackerStore::open_in_memory().unwrap();
        let project = store.create_project("Export Me").unwrap();
        for day in 0..count {
            store
                .create_entry(
                    project,
                    &EntryInput {
                        date: parse_date(&format!("2024-02-{:02}", day + 1)).unwrap(),
                        hours: 1.5,
                        description: Some(format!("Task {}", day + 1)),
                    },
                )
                .unwrap();
        }
        Report::generate(&store, project, DateRange::all()).unwrap()
    }

    #[test]
    fn test_export_writes_xlsx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.xlsx");
        let report = report_with_entries(3);

        export_report_xlsx(&report, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_export_refuses_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let report = report_with_entries(0);

        assert!(matches!(
            export_report_xlsx(&report, &path),
            Err(ExportError::EmptyReport)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_output_path() {
        let explicit = PathBuf::from("/somewhere/mine.xlsx");
        assert_eq!(
            resolve_output_path(Some(explicit.clone()), &[], "x.xlsx").unwrap(),
            explicit
        );

        let dirs = [None, Some(PathBuf::from("/exports")), Some(PathBuf::from("/home"))];
        assert_eq!(
            resolve_output_path(None, &dirs, "x.xlsx").unwrap(),
            PathBuf::from("/exports/x.xlsx")
        );

        assert!(matches!(
            resolve_output_path(None, &[None, None], "x.xlsx"),
            Err(ExportError::NoDirFound)
        ));
    }
}
