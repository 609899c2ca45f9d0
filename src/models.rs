// ABOUTME: Shared data models for Time Tracker
// ABOUTME: Projects, time entries, summaries and the inclusive date range used by reports

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage format for entry dates. ISO ordering makes text comparison chronological.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format SQLite uses for `CURRENT_TIMESTAMP`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Well-known keys in the settings table
pub mod setting_keys {
    /// Directory exported reports are written to when no output path is given
    pub const EXPORT_DIRECTORY: &str = "export.directory";
    /// Last used report lower bound
    pub const REPORT_FROM: &str = "report.from";
    /// Last used report upper bound
    pub const REPORT_TO: &str = "report.to";
}

/// A named unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
}

/// A project together with the aggregates shown in the project list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    #[serde(rename = "entryCount")]
    pub entry_count: u32,
    #[serde(rename = "totalHours")]
    pub total_hours: f64,
}

/// A dated record of hours spent on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    #[serde(rename = "projectId")]
    pub project_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
}

/// Values needed to create or overwrite an entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInput {
    pub date: NaiveDate,
    pub hours: f64,
    pub description: Option<String>,
}

#[derive(Error, Debug, PartialEq)]
pub enum RangeError {
    #[error("From date {from} is after to date {to}")]
    Inverted { from: NaiveDate, to: NaiveDate },
}

/// Optional date bounds, both inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, RangeError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(RangeError::Inverted { from, to });
            }
        }
        Ok(Self { from, to })
    }

    /// Range with no bounds
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
