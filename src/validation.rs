// ABOUTME: Form-field validation for Time Tracker
// ABOUTME: Turns raw user input into project names and entry values

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::parse_date;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Please enter a project name")]
    EmptyProjectName,
    #[error("Please enter hours")]
    MissingHours,
    #[error("Please enter a valid number for hours")]
    InvalidHours,
    #[error("Hours must be greater than 0")]
    NonPositiveHours,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Trim a project name and reject blanks
pub fn project_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyProjectName);
    }
    Ok(name.to_string())
}

/// Parse an hours field; must be a finite number above zero
pub fn hours(raw: &str) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingHours);
    }
    let value: f64 = raw.parse().map_err(|_| ValidationError::InvalidHours)?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidHours);
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveHours);
    }
    Ok(value)
}

pub fn date(raw: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(raw).map_err(|_| ValidationError::InvalidDate(raw.trim().to_string()))
}

/// Blank descriptions are stored as NULL
pub fn description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
