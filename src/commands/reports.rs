// ABOUTME: Report and export commands
// ABOUTME: Builds on-demand reports and writes them to spreadsheet files

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::db::TrackerStore;
use crate::export::{export_report_xlsx, resolve_output_path};
use crate::models::setting_keys;
use crate::report::{remember_range, resolve_range, Report};
use crate::validation;
use crate::ApiResponse;

/// Raw report filter input
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub project_id: i64,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Forget the remembered range before applying `from`/`to`
    pub clear_range: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub path: PathBuf,
    #[serde(rename = "entryCount")]
    pub entry_count: usize,
    #[serde(rename = "totalHours")]
    pub total_hours: f64,
}

fn build_report(store: &TrackerStore, request: &ReportRequest) -> Result<Report, String> {
    let from = request
        .from
        .as_deref()
        .map(validation::date)
        .transpose()
        .map_err(|e| e.to_string())?;
    let to = request
        .to
        .as_deref()
        .map(validation::date)
        .transpose()
        .map_err(|e| e.to_string())?;

    let range = resolve_range(store, from, to, request.clear_range)
        .map_err(|e| format!("Error generating report: {}", e))?;

    Report::generate(store, request.project_id, range)
        .map_err(|e| format!("Error generating report: {}", e))
}

/// Keep the bounds of a report that was actually produced for the next request
fn remember(store: &TrackerStore, report: &Report) {
    if let Err(e) = remember_range(store, &report.range) {
        log::warn!("Could not remember report range: {}", e);
    }
}

/// Generate a report for one project over an optional inclusive date range
pub fn generate_report(store: &TrackerStore, request: &ReportRequest) -> ApiResponse<Report> {
    match build_report(store, request) {
        Ok(report) => {
            remember(store, &report);
            if report.is_empty() {
                ApiResponse::success(report)
                    .with_info("No entries found for the selected criteria")
            } else {
                ApiResponse::success(report)
            }
        }
        Err(message) => ApiResponse::error(message),
    }
}

/// Generate a report and save it as an .xlsx workbook
pub fn export_report(
    store: &TrackerStore,
    config: &AppConfig,
    request: &ReportRequest,
    output: Option<PathBuf>,
    today: NaiveDate,
) -> ApiResponse<ExportResult> {
    let report = match build_report(store, request) {
        Ok(report) => report,
        Err(message) => return ApiResponse::error(message),
    };

    let export_dir = match store.get_setting(setting_keys::EXPORT_DIRECTORY, None) {
        Ok(dir) => dir.map(PathBuf::from),
        Err(e) => return ApiResponse::error(format!("Failed to get settings: {}", e)),
    };
    let directories = [export_dir, config.export_dir.clone(), dirs::home_dir()];

    let path = match resolve_output_path(output, &directories, &report.default_file_name(today)) {
        Ok(p) => p,
        Err(e) => return ApiResponse::error(format!("Error exporting to Excel: {}", e)),
    };

    match export_report_xlsx(&report, &path) {
        Ok(_) => {
            remember(store, &report);
            let message = format!("Report exported to {}", path.display());
            ApiResponse::success(ExportResult {
                path,
                entry_count: report.entry_count,
                total_hours: report.total_hours,
            })
            .with_success(message)
        }
        Err(e) => ApiResponse::error(format!("Error exporting to Excel: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, EntryInput};

    fn seeded() -> (TrackerStore, i64) {
        let store = TrackerStore::open_in_memory().unwrap();
        let project = store.create_project("Reports").unwrap();
        for (date, hours) in [("2024-01-10", 2.0), ("2024-01-20", 3.0), ("2024-02-05", 4.0)] {
            store
                .create_entry(
                    project,
                    &EntryInput {
                        date: parse_date(date).unwrap(),
                        hours,
                        description: Some(format!("Work on {}", date)),
                    },
                )
                .unwrap();
        }
        (store, project)
    }

    fn today() -> NaiveDate {
        parse_date("2024-03-01").unwrap()
    }

    #[test]
    fn test_generate_report_with_range() {
        let (store, project) = seeded();
        let request = ReportRequest {
            project_id: project,
            from: Some("2024-01-10".to_string()),
            to: Some("2024-01-20".to_string()),
            ..Default::default()
        };
        let response = generate_report(&store, &request);
        assert!(response.success);
        let report = response.data.unwrap();
        assert_eq!(report.entry_count, 2);
        assert!((report.total_hours - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_generate_report_messages() {
        let (store, project) = seeded();

        let empty = generate_report(
            &store,
            &ReportRequest {
                project_id: project,
                from: Some("2030-01-01".to_string()),
                ..Default::default()
            },
        );
        assert!(empty.success);
        assert_eq!(
            empty.messages.info,
            vec!["No entries found for the selected criteria"]
        );

        let bad_date = generate_report(
            &store,
            &ReportRequest {
                project_id: project,
                to: Some("soon".to_string()),
                clear_range: true,
                ..Default::default()
            },
        );
        assert_eq!(
            bad_date.messages.error,
            vec!["Invalid date 'soon', expected YYYY-MM-DD"]
        );

        let missing = generate_report(
            &store,
            &ReportRequest {
                project_id: 77,
                clear_range: true,
                ..Default::default()
            },
        );
        assert_eq!(
            missing.messages.error,
            vec!["Error generating report: Project not found: 77"]
        );
    }

    #[test]
    fn test_failed_report_keeps_remembered_range() {
        let (store, project) = seeded();
        store.set_setting(setting_keys::REPORT_TO, "2024-01-31").unwrap();

        let missing = generate_report(
            &store,
            &ReportRequest {
                project_id: 999,
                from: Some("2030-01-01".to_string()),
                ..Default::default()
            },
        );
        assert!(!missing.success);
        let settings = store.get_all_settings().unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[setting_keys::REPORT_TO], "2024-01-31");

        let next = generate_report(
            &store,
            &ReportRequest {
                project_id: project,
                ..Default::default()
            },
        );
        let report = next.data.unwrap();
        assert_eq!(report.range.from, None);
        assert_eq!(report.entry_count, 2);
    }

    #[test]
    fn test_successful_report_is_remembered() {
        let (store, project) = seeded();
        let response = generate_report(
            &store,
            &ReportRequest {
                project_id: project,
                from: Some("2024-01-15".to_string()),
                ..Default::default()
            },
        );
        assert!(response.success);
        assert_eq!(
            store.get_setting(setting_keys::REPORT_FROM, None).unwrap().as_deref(),
            Some("2024-01-15")
        );

        let again = generate_report(
            &store,
            &ReportRequest {
                project_id: project,
                ..Default::default()
            },
        );
        assert_eq!(again.data.unwrap().entry_count, 2);
    }

    #[test]
    fn test_export_to_explicit_path() {
        let (store, project) = seeded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hours.xlsx");

        let response = export_report(
            &store,
            &AppConfig::default(),
            &ReportRequest {
                project_id: project,
                ..Default::default()
            },
            Some(path.clone()),
            today(),
        );
        assert!(response.success);
        let result = response.data.unwrap();
        assert_eq!(result.path, path);
        assert_eq!(result.entry_count, 3);
        assert!(path.exists());
    }

    #[test]
    fn test_export_uses_export_directory_setting() {
        let (store, project) = seeded();
        let dir = tempfile::tempdir().unwrap();
        store
            .set_setting(
                setting_keys::EXPORT_DIRECTORY,
                &dir.path().to_string_lossy(),
            )
            .unwrap();

        let response = export_report(
            &store,
            &AppConfig::default(),
            &ReportRequest {
                project_id: project,
                ..Default::default()
            },
            None,
            today(),
        );
        assert!(response.success);
        let expected = dir.path().join("Reports_report_20240301.xlsx");
        assert_eq!(response.data.unwrap().path, expected);
        assert!(expected.exists());
    }

    #[test]
    fn test_export_empty_report_fails() {
        let (store, project) = seeded();
        let dir = tempfile::tempdir().unwrap();
        let response = export_report(
            &store,
            &AppConfig::default(),
            &ReportRequest {
                project_id: project,
                from: Some("2031-01-01".to_string()),
                ..Default::default()
            },
            Some(dir.path().join("none.xlsx")),
            today(),
        );
        assert!(!response.success);
        assert_eq!(
            response.messages.error,
            vec!["Error exporting to Excel: No entries found for the selected criteria"]
        );
        // The failed export leaves no remembered range behind
        assert!(store.get_all_settings().unwrap().is_empty());
    }
}
