// ABOUTME: Project management commands
// ABOUTME: CRUD operations for projects plus the project-detail view data

use serde::{Deserialize, Serialize};

use crate::db::TrackerStore;
use crate::models::{DateRange, Entry, Project, ProjectSummary};
use crate::report::total_hours;
use crate::validation;
use crate::ApiResponse;

/// Everything the project-detail view shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub entries: Vec<Entry>,
    #[serde(rename = "entryCount")]
    pub entry_count: usize,
    #[serde(rename = "totalHours")]
    pub total_hours: f64,
}

/// Get all projects with entry counts and total hours
pub fn list_projects(store: &TrackerStore) -> ApiResponse<Vec<ProjectSummary>> {
    match store.get_project_summaries() {
        Ok(projects) => ApiResponse::success(projects),
        Err(e) => ApiResponse::error(format!("Failed to get projects: {}", e)),
    }
}

/// Create a new project
pub fn create_project(store: &TrackerStore, name: &str) -> ApiResponse<Project> {
    let name = match validation::project_name(name) {
        Ok(n) => n,
        Err(e) => return ApiResponse::error(e.to_string()),
    };

    let id = match store.create_project(&name) {
        Ok(id) => id,
        Err(e) => return ApiResponse::error(format!("Error creating project: {}", e)),
    };

    match store.get_project(id) {
        Ok(Some(project)) => ApiResponse::success(project)
            .with_success(format!("Project '{}' created successfully", name)),
        Ok(None) => ApiResponse::error(format!("Project not found: {}", id)),
        Err(e) => ApiResponse::error(format!("Error creating project: {}", e)),
    }
}

/// Rename an existing project
pub fn rename_project(store: &TrackerStore, project_id: i64, name: &str) -> ApiResponse<Project> {
    let name = match validation::project_name(name) {
        Ok(n) => n,
        Err(e) => return ApiResponse::error(e.to_string()),
    };

    if let Err(e) = store.update_project(project_id, &name) {
        return ApiResponse::error(format!("Error updating project: {}", e));
    }

    match store.get_project(project_id) {
        Ok(Some(project)) => {
            ApiResponse::success(project).with_success("Project updated successfully")
        }
        Ok(None) => ApiResponse::error(format!("Project not found: {}", project_id)),
        Err(e) => ApiResponse::error(format!("Error updating project: {}", e)),
    }
}

/// Delete a project and all of its entries
pub fn delete_project(store: &TrackerStore, project_id: i64) -> ApiResponse<()> {
    match store.delete_project(project_id) {
        Ok(_) => ApiResponse::success(()).with_success("Project deleted successfully"),
        Err(e) => ApiResponse::error(format!("Error deleting project: {}", e)),
    }
}

/// Get a project with all its entries, newest first
pub fn project_detail(store: &TrackerStore, project_id: i64) -> ApiResponse<ProjectDetail> {
    let project = match store.get_project(project_id) {
        Ok(Some(p)) => p,
        Ok(None) => return ApiResponse::error("Project not found".to_string()),
        Err(e) => return ApiResponse::error(format!("Failed to get project: {}", e)),
    };

    match store.get_entries_for_project(project_id, &DateRange::all()) {
        Ok(entries) => ApiResponse::success(ProjectDetail {
            entry_count: entries.len(),
            total_hours: total_hours(&entries),
            project,
            entries,
        }),
        Err(e) => ApiResponse::error(format!("Failed to get entries: {}", e)),
    }
}
