// ABOUTME: Time entry commands
// ABOUTME: Validates entry form input and creates, edits or deletes entries

use chrono::NaiveDate;

use crate::db::TrackerStore;
use crate::models::{Entry, EntryInput};
use crate::validation::{self, ValidationError};
use crate::ApiResponse;

/// Raw form values for a new entry
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    /// Defaults to today when omitted
    pub date: Option<String>,
    pub hours: String,
    pub description: Option<String>,
}

/// Fields to change on an existing entry; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub date: Option<String>,
    pub hours: Option<String>,
    /// `Some("")` clears the description
    pub description: Option<String>,
}

impl EntryForm {
    fn validate(&self, today: NaiveDate) -> Result<EntryInput, ValidationError> {
        let date = match &self.date {
            Some(raw) => validation::date(raw)?,
            None => today,
        };
        Ok(EntryInput {
            date,
            hours: validation::hours(&self.hours)?,
            description: validation::description(self.description.as_deref()),
        })
    }
}

impl EntryPatch {
    fn apply(&self, current: &Entry) -> Result<EntryInput, ValidationError> {
        let date = match &self.date {
            Some(raw) => validation::date(raw)?,
            None => current.date,
        };
        let hours = match &self.hours {
            Some(raw) => validation::hours(raw)?,
            None => current.hours,
        };
        let description = match &self.description {
            Some(raw) => validation::description(Some(raw)),
            None => current.description.clone(),
        };
        Ok(EntryInput {
            date,
            hours,
            description,
        })
    }
}

/// Record a new entry on a project
pub fn add_entry(
    store: &TrackerStore,
    project_id: i64,
    form: &EntryForm,
    today: NaiveDate,
) -> ApiResponse<Entry> {
    let input = match form.validate(today) {
        Ok(input) => input,
        Err(e) => return ApiResponse::error(e.to_string()),
    };

    let id = match store.create_entry(project_id, &input) {
        Ok(id) => id,
        Err(e) => return ApiResponse::error(format!("Error saving entry: {}", e)),
    };

    match store.get_entry(id) {
        Ok(Some(entry)) => ApiResponse::success(entry).with_success("Entry created successfully"),
        Ok(None) => ApiResponse::error(format!("Entry not found: {}", id)),
        Err(e) => ApiResponse::error(format!("Error saving entry: {}", e)),
    }
}

/// Change an existing entry
pub fn edit_entry(store: &TrackerStore, entry_id: i64, patch: &EntryPatch) -> ApiResponse<Entry> {
    let current = match store.get_entry(entry_id) {
        Ok(Some(entry)) => entry,
        Ok(None) => return ApiResponse::error(format!("Entry not found: {}", entry_id)),
        Err(e) => return ApiResponse::error(format!("Failed to get entry: {}", e)),
    };

    let input = match patch.apply(&current) {
        Ok(input) => input,
        Err(e) => return ApiResponse::error(e.to_string()),
    };

    if let Err(e) = store.update_entry(entry_id, &input) {
        return ApiResponse::error(format!("Error saving entry: {}", e));
    }

    match store.get_entry(entry_id) {
        Ok(Some(entry)) => ApiResponse::success(entry).with_success("Entry updated successfully"),
        Ok(None) => ApiResponse::error(format!("Entry not found: {}", entry_id)),
        Err(e) => ApiResponse::error(format!("Error saving entry: {}", e)),
    }
}

/// Delete an entry
pub fn delete_entry(store: &TrackerStore, entry_id: i64) -> ApiResponse<()> {
    match store.delete_entry(entry_id) {
        Ok(_) => ApiResponse::success(()).with_success("Entry deleted successfully"),
        Err(e) => ApiResponse::error(format!("Error deleting entry: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn form(date: Option<&str>, hours: &str, description: Option<&str>) -> EntryForm {
        EntryForm {
            date: date.map(str::to_string),
            hours: hours.to_string(),
            description: description.map(str::to_string),
        }
    }

    fn store_with_project() -> (TrackerStore, i64) {
        let store = TrackerStore::open_in_memory().unwrap();
        let id = store.create_project("Entries").unwrap();
        (store, id)
    }

    #[test]
    fn test_add_entry_defaults_to_today() {
        let (store, project) = store_with_project();
        let added = add_entry(&store, project, &form(None, "2.5", Some("  ")), today());
        assert!(added.success);
        let entry = added.data.unwrap();
        assert_eq!(entry.date, today());
        assert_eq!(entry.hours, 2.5);
        assert_eq!(entry.description, None);
        assert_eq!(added.messages.success, vec!["Entry created successfully"]);
    }

    #[test]
    fn test_add_entry_validation_messages() {
        let (store, project) = store_with_project();
        let cases = [
            (form(None, "", None), "Please enter hours"),
            (form(None, "two", None), "Please enter a valid number for hours"),
            (form(None, "0", None), "Hours must be greater than 0"),
            (
                form(Some("June 1"), "1", None),
                "Invalid date 'June 1', expected YYYY-MM-DD",
            ),
        ];
        for (input, message) in cases {
            let response = add_entry(&store, project, &input, today());
            assert!(!response.success);
            assert_eq!(response.messages.error, vec![message]);
        }
        assert_eq!(store.count_entries().unwrap(), 0);
    }

    #[test]
    fn test_add_entry_unknown_project() {
        let (store, _) = store_with_project();
        let response = add_entry(&store, 404, &form(None, "1", None), today());
        assert_eq!(
            response.messages.error,
            vec!["Error saving entry: Project not found: 404"]
        );
    }

    #[test]
    fn test_edit_entry_keeps_unchanged_fields() {
        let (store, project) = store_with_project();
        let entry = add_entry(
            &store,
            project,
            &form(Some("2024-05-20"), "3", Some("Planning")),
            today(),
        )
        .data
        .unwrap();

        let patch = EntryPatch {
            hours: Some("4.25".to_string()),
            ..Default::default()
        };
        let edited = edit_entry(&store, entry.id, &patch).data.unwrap();
        assert_eq!(edited.hours, 4.25);
        assert_eq!(edited.date, entry.date);
        assert_eq!(edited.description.as_deref(), Some("Planning"));

        let clear = EntryPatch {
            description: Some(String::new()),
            date: Some("2024-05-21".to_string()),
            ..Default::default()
        };
        let edited = edit_entry(&store, entry.id, &clear).data.unwrap();
        assert_eq!(edited.description, None);
        assert_eq!(edited.date.to_string(), "2024-05-21");

        let bad = EntryPatch {
            hours: Some("-2".to_string()),
            ..Default::default()
        };
        let response = edit_entry(&store, entry.id, &bad);
        assert!(!response.success);
        assert_eq!(store.get_entry(entry.id).unwrap().unwrap().hours, 4.25);
    }

    #[test]
    fn test_edit_and_delete_missing_entry() {
        let (store, _) = store_with_project();
        assert_eq!(
            edit_entry(&store, 5, &EntryPatch::default()).messages.error,
            vec!["Entry not found: 5"]
        );
        assert_eq!(
            delete_entry(&store, 5).messages.error,
            vec!["Error deleting entry: Entry not found: 5"]
        );
    }

    #[test]
    fn test_delete_entry() {
        let (store, project) = store_with_project();
        let entry = add_entry(&store, project, &form(None, "1", None), today())
            .data
            .unwrap();
        let response = delete_entry(&store, entry.id);
        assert!(response.success);
        assert_eq!(response.messages.success, vec!["Entry deleted successfully"]);
        assert_eq!(store.count_entries().unwrap(), 0);
    }
}
