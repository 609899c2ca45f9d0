// ABOUTME: SQLite storage for Time Tracker
// ABOUTME: Stores projects, time entries and key/value settings locally

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::models::{
    format_date, DateRange, Entry, EntryInput, Project, ProjectSummary, DATE_FORMAT,
    TIMESTAMP_FORMAT,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Data directory not found")]
    NoDirFound,
    #[error("Database connection lock poisoned")]
    LockPoisoned,
    #[error("A project named '{0}' already exists")]
    DuplicateProject(String),
    #[error("Project not found: {0}")]
    ProjectNotFound(i64),
    #[error("Entry not found: {0}")]
    EntryNotFound(i64),
}

const SCHEMA: &str = r#"
    -- Projects table
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );

    -- Entries table
    CREATE TABLE IF NOT EXISTS entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL,
        date DATE NOT NULL,
        hours REAL NOT NULL,
        description TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
    );

    -- Settings table
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_entries_project_date ON entries(project_id, date);
"#;

const ENTRY_COLUMNS: &str = "id, project_id, date, hours, description, created_at";

pub struct TrackerStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl TrackerStore {
    /// Get the default database file path
    pub fn default_db_path() -> Result<PathBuf, StoreError> {
        let data_dir = dirs::data_local_dir().ok_or(StoreError::NoDirFound)?;
        Ok(data_dir.join("Time Tracker").join("time_tracker.db"))
    }

    /// Open or create the database at the default location
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(Self::default_db_path()?)
    }

    /// Open or create the database at `path`
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        log::debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open a volatile database that disappears when the store is dropped
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Location of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Initialize database schema
    fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ===== Projects =====

    /// Create a new project and return its ID
    pub fn create_project(&self, name: &str) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO projects (name) VALUES (?)", params![name])
            .map_err(|e| map_duplicate(e, name))?;
        let id = conn.last_insert_rowid();
        log::info!("Created project '{}' ({})", name, id);
        Ok(id)
    }

    /// Get all projects ordered by name
    pub fn get_all_projects(&self) -> Result<Vec<Project>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM projects ORDER BY name")?;

        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    /// Get all projects with their entry count and total hours
    pub fn get_project_summaries(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, p.created_at, COUNT(e.id), COALESCE(SUM(e.hours), 0.0)
             FROM projects p
             LEFT JOIN entries e ON e.project_id = p.id
             GROUP BY p.id
             ORDER BY p.name",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(ProjectSummary {
                    project: project_from_row(row)?,
                    entry_count: row.get(3)?,
                    total_hours: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    /// Get a specific project by ID
    pub fn get_project(&self, project_id: i64) -> Result<Option<Project>, StoreError> {
        let conn = self.conn()?;
        let project = conn
            .query_row(
                "SELECT id, name, created_at FROM projects WHERE id = ?",
                params![project_id],
                project_from_row,
            )
            .optional()?;
        Ok(project)
    }

    /// Rename a project
    pub fn update_project(&self, project_id: i64, name: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE projects SET name = ? WHERE id = ?",
                params![name, project_id],
            )
            .map_err(|e| map_duplicate(e, name))?;
        if changed == 0 {
            return Err(StoreError::ProjectNotFound(project_id));
        }
        log::info!("Renamed project {} to '{}'", project_id, name);
        Ok(())
    }

    /// Delete a project and all its entries
    pub fn delete_project(&self, project_id: i64) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let removed_entries =
            tx.execute("DELETE FROM entries WHERE project_id = ?", params![project_id])?;
        let removed = tx.execute("DELETE FROM projects WHERE id = ?", params![project_id])?;
        if removed == 0 {
            // Dropping the transaction rolls it back
            return Err(StoreError::ProjectNotFound(project_id));
        }
        tx.commit()?;
        log::info!(
            "Deleted project {} together with {} entries",
            project_id,
            removed_entries
        );
        Ok(())
    }

    // ===== Entries =====

    /// Create a new entry and return its ID
    pub fn create_entry(&self, project_id: i64, input: &EntryInput) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        ensure_project_exists(&conn, project_id)?;
        conn.execute(
            "INSERT INTO entries (project_id, date, hours, description) VALUES (?, ?, ?, ?)",
            params![
                project_id,
                format_date(input.date),
                input.hours,
                input.description,
            ],
        )?;
        let id = conn.last_insert_rowid();
        log::info!(
            "Recorded {} hours on {} for project {}",
            input.hours,
            format_date(input.date),
            project_id
        );
        Ok(id)
    }

    /// Get entries for a project, newest first, optionally filtered by an inclusive date range
    pub fn get_entries_for_project(
        &self,
        project_id: i64,
        range: &DateRange,
    ) -> Result<Vec<Entry>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS}
             FROM entries
             WHERE project_id = ?1
               AND (?2 IS NULL OR date >= ?2)
               AND (?3 IS NULL OR date <= ?3)
             ORDER BY date DESC, id DESC"
        ))?;

        let entries = stmt
            .query_map(
                params![
                    project_id,
                    range.from.map(format_date),
                    range.to.map(format_date),
                ],
                entry_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Get a specific entry by ID
    pub fn get_entry(&self, entry_id: i64) -> Result<Option<Entry>, StoreError> {
        let conn = self.conn()?;
        let entry = conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?"),
                params![entry_id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Overwrite an entry's date, hours and description
    pub fn update_entry(&self, entry_id: i64, input: &EntryInput) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE entries SET date = ?, hours = ?, description = ? WHERE id = ?",
            params![
                format_date(input.date),
                input.hours,
                input.description,
                entry_id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::EntryNotFound(entry_id));
        }
        Ok(())
    }

    /// Delete an entry
    pub fn delete_entry(&self, entry_id: i64) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM entries WHERE id = ?", params![entry_id])?;
        if removed == 0 {
            return Err(StoreError::EntryNotFound(entry_id));
        }
        Ok(())
    }

    /// Count all entries across projects
    pub fn count_entries(&self) -> Result<u32, StoreError> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count)
    }

    // ===== Settings =====

    /// Get a setting value by key, falling back to `default` when absent
    pub fn get_setting(&self, key: &str, default: Option<&str>) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.or_else(|| default.map(str::to_string)))
    }

    /// Insert or update a setting
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a setting, returning whether it existed
    pub fn delete_setting(&self, key: &str) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM settings WHERE key = ?", params![key])?;
        Ok(removed > 0)
    }

    /// Get all settings keyed by name
    pub fn get_all_settings(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
        let settings = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(settings)
    }
}

fn ensure_project_exists(conn: &Connection, project_id: i64) -> Result<(), StoreError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM projects WHERE id = ?",
            params![project_id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if exists {
        Ok(())
    } else {
        Err(StoreError::ProjectNotFound(project_id))
    }
}

fn map_duplicate(error: rusqlite::Error, name: &str) -> StoreError {
    match &error {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::DuplicateProject(name.to_string())
        }
        _ => StoreError::Sqlite(error),
    }
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let value: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: timestamp_at(row, 2)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let date: String = row.get(2)?;
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Entry {
        id: row.get(0)?,
        project_id: row.get(1)?,
        date,
        hours: row.get(3)?,
        description: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
    })
}
