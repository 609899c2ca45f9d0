// ABOUTME: On-demand report generation for Time Tracker
// ABOUTME: Filters a project's entries by an inclusive date range and sums the hours

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{StoreError, TrackerStore};
use crate::models::{
    format_date, parse_date, setting_keys, DateRange, Entry, Project, RangeError,
};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("Project not found: {0}")]
    ProjectNotFound(i64),
}

/// A non-persisted aggregation of one project's entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub project: Project,
    pub range: DateRange,
    pub entries: Vec<Entry>,
    #[serde(rename = "entryCount")]
    pub entry_count: usize,
    #[serde(rename = "totalHours")]
    pub total_hours: f64,
}

impl Report {
    pub fn generate(
        store: &TrackerStore,
        project_id: i64,
        range: DateRange,
    ) -> Result<Self, ReportError> {
        let project = store
            .get_project(project_id)?
            .ok_or(ReportError::ProjectNotFound(project_id))?;
        let entries = store.get_entries_for_project(project_id, &range)?;
        let total_hours = total_hours(&entries);

        log::debug!(
            "Report for '{}': {} entries, {:.2} hours",
            project.name,
            entries.len(),
            total_hours
        );

        Ok(Self {
            entry_count: entries.len(),
            total_hours,
            project,
            range,
            entries,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File name offered when saving this report
    pub fn default_file_name(&self, today: NaiveDate) -> String {
        format!(
            "{}_report_{}.xlsx",
            sanitize_file_stem(&self.project.name),
            today.format("%Y%m%d")
        )
    }
}

pub fn total_hours(entries: &[Entry]) -> f64 {
    entries.iter().map(|e| e.hours).sum()
}

/// Replace characters that are not allowed in file names on common platforms
fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Combine explicitly given bounds with the ones remembered from the last report.
///
/// Explicit bounds win. A remembered bound that would invert the range against
/// an explicit one is dropped. With `clear` nothing remembered is used. Nothing
/// is written here; see [`remember_range`].
pub fn resolve_range(
    store: &TrackerStore,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    clear: bool,
) -> Result<DateRange, ReportError> {
    let remembered = |key: &str| -> Result<Option<NaiveDate>, StoreError> {
        if clear {
            Ok(None)
        } else {
            remembered_date(store, key)
        }
    };

    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (Some(from), Some(to)),
        (Some(from), None) => {
            let to = remembered(setting_keys::REPORT_TO)?.filter(|to| *to >= from);
            (Some(from), to)
        }
        (None, Some(to)) => {
            let from = remembered(setting_keys::REPORT_FROM)?.filter(|from| *from <= to);
            (from, Some(to))
        }
        (None, None) => (
            remembered(setting_keys::REPORT_FROM)?,
            remembered(setting_keys::REPORT_TO)?,
        ),
    };

    Ok(DateRange::new(from, to)?)
}

/// Store the bounds of a report that was produced so the next one reuses them
pub fn remember_range(store: &TrackerStore, range: &DateRange) -> Result<(), StoreError> {
    for (key, bound) in [
        (setting_keys::REPORT_FROM, range.from),
        (setting_keys::REPORT_TO, range.to),
    ] {
        match bound {
            Some(date) => store.set_setting(key, &format_date(date))?,
            None => {
                store.delete_setting(key)?;
            }
        }
    }
    Ok(())
}

fn remembered_date(store: &TrackerStore, key: &str) -> Result<Option<NaiveDate>, StoreError> {
    let value = store.get_setting(key, None)?;
    Ok(value.and_then(|v| match parse_date(&v) {
        Ok(date) => Some(date),
        Err(_) => {
            log::warn!("Ignoring unreadable date '{}' in setting {}", v, key);
            None
        }
    }))
}
