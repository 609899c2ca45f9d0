// ABOUTME: Command module exports
// ABOUTME: Organizes all user-triggered actions by category

pub mod entries;
pub mod projects;
pub mod reports;
pub mod settings;

pub use entries::*;
pub use projects::*;
pub use reports::*;
pub use settings::*;
