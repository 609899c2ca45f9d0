// ABOUTME: Database module exports for Time Tracker
// ABOUTME: Contains the SQLite store for projects, entries and settings

pub mod store;

pub use store::{StoreError, TrackerStore};
