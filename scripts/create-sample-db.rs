// Script to create a sample database with a few projects and entries
// Run with: cargo run --bin create-sample-db [-- <path>]

use chrono::{Duration, Local};
use std::path::PathBuf;

use time_tracker_lib::db::TrackerStore;
use time_tracker_lib::models::{setting_keys, EntryInput};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("resources/time_tracker_sample.db"));

    // Remove existing if present
    if db_path.exists() {
        std::fs::remove_file(&db_path)?;
    }

    let store = TrackerStore::open_at(&db_path)?;
    let today = Local::now().date_naive();

    let projects: [(&str, &[(i64, f64, &str)]); 3] = [
        (
            "Website Redesign",
            &[
                (0, 3.5, "Landing page layout"),
                (1, 2.0, "Review with client"),
                (6, 4.0, "Style guide"),
            ],
        ),
        (
            "Internal Tools",
            &[(2, 1.5, "Fix report export"), (9, 2.25, "Dependency upgrades")],
        ),
        ("Research", &[]),
    ];

    for (name, entries) in projects {
        let project_id = store.create_project(name)?;
        for (days_ago, hours, description) in entries {
            store.create_entry(
                project_id,
                &EntryInput {
                    date: today - Duration::days(*days_ago),
                    hours: *hours,
                    description: Some(description.to_string()),
                },
            )?;
        }
    }

    store.set_setting(setting_keys::EXPORT_DIRECTORY, "exports")?;

    println!("✅ Created sample database at: {}", db_path.display());
    println!("   Projects: {}", store.get_all_projects()?.len());
    println!("   Entries: {}", store.count_entries()?);

    Ok(())
}
