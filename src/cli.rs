// ABOUTME: Command-line front end for Time Tracker
// ABOUTME: Parses arguments, asks for delete confirmation and dispatches to commands and views

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::commands::{self, EntryForm, EntryPatch, ReportRequest};
use crate::config::AppConfig;
use crate::db::TrackerStore;
use crate::view::{self, ViewOptions};
use crate::ApiResponse;

/// Record work hours against projects and report on them
#[derive(Parser, Debug)]
#[command(name = "time-tracker", author, version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file to use instead of the per-user one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print JSON responses instead of rendered views
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommand),
    /// Manage time entries
    #[command(subcommand)]
    Entries(EntryCommand),
    /// Show a report for one project
    Report(ReportArgs),
    /// Save a report as an .xlsx spreadsheet
    Export(ExportArgs),
    /// Read and write stored settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Show where data is stored
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List projects with entry counts and total hours
    List,
    /// Create a project
    Add { name: String },
    /// Rename a project
    Rename { id: i64, name: String },
    /// Delete a project and all of its entries
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show a project with its entries
    Show { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    /// Record hours on a project
    Add {
        project_id: i64,
        /// Hours worked, e.g. 2.5
        #[arg(long, allow_hyphen_values = true)]
        hours: String,
        /// Day worked (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// What was worked on
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Change an entry; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long, allow_hyphen_values = true)]
        hours: Option<String>,
        #[arg(long)]
        date: Option<String>,
        /// New description, an empty string clears it
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete an entry
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    pub project_id: i64,
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Forget the remembered from/to dates
    #[arg(long)]
    pub clear_range: bool,
}

impl RangeArgs {
    fn request(&self) -> ReportRequest {
        ReportRequest {
            project_id: self.project_id,
            from: self.from.clone(),
            to: self.to.clone(),
            clear_range: self.clear_range,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub range: RangeArgs,
    /// Destination file; defaults to <export dir>/<project>_report_<YYYYMMDD>.xlsx
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// List all settings
    List,
    /// Print one setting
    Get { key: String },
    /// Store a setting
    Set { key: String, value: String },
    /// Remove a setting
    Unset { key: String },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Ask a yes/no question on stderr, defaulting to no
fn confirm(prompt: &str) -> io::Result<bool> {
    let mut err = io::stderr();
    write!(err, "{} [y/N] ", prompt)?;
    err.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Outcome of a delete the user declined; still a response so `--json` has something to parse
fn cancelled() -> ApiResponse<()> {
    ApiResponse::success(()).with_warning("Deletion cancelled")
}

/// Run one command against the store. Returns whether it succeeded.
pub fn execute(
    command: &Command,
    store: &TrackerStore,
    config: &AppConfig,
    json: bool,
) -> io::Result<bool> {
    let opts = ViewOptions {
        precision: config.hours_precision,
    };

    match command {
        Command::Projects(cmd) => match cmd {
            ProjectCommand::List => view::emit(&commands::list_projects(store), json, |p| {
                view::render_project_list(p, &opts)
            }),
            ProjectCommand::Add { name } => view::emit(
                &commands::create_project(store, name),
                json,
                |_| String::new(),
            ),
            ProjectCommand::Rename { id, name } => view::emit(
                &commands::rename_project(store, *id, name),
                json,
                |_| String::new(),
            ),
            ProjectCommand::Delete { id, yes } => {
                if !yes {
                    let prompt = match store.get_project(*id) {
                        Ok(Some(p)) => format!(
                            "Are you sure you want to delete '{}'? All entries will be deleted too.",
                            p.name
                        ),
                        _ => format!("Are you sure you want to delete project {}?", id),
                    };
                    if !confirm(&prompt)? {
                        return view::emit(&cancelled(), json, |_| String::new());
                    }
                }
                view::emit(&commands::delete_project(store, *id), json, |_| {
                    String::new()
                })
            }
            ProjectCommand::Show { id } => {
                view::emit(&commands::project_detail(store, *id), json, |d| {
                    view::render_project_detail(d, &opts)
                })
            }
        },
        Command::Entries(cmd) => match cmd {
            EntryCommand::Add {
                project_id,
                hours,
                date,
                description,
            } => {
                let form = EntryForm {
                    date: date.clone(),
                    hours: hours.clone(),
                    description: description.clone(),
                };
                view::emit(
                    &commands::add_entry(store, *project_id, &form, today()),
                    json,
                    |e| view::render_entry(e, &opts),
                )
            }
            EntryCommand::Edit {
                id,
                hours,
                date,
                description,
            } => {
                let patch = EntryPatch {
                    date: date.clone(),
                    hours: hours.clone(),
                    description: description.clone(),
                };
                view::emit(&commands::edit_entry(store, *id, &patch), json, |e| {
                    view::render_entry(e, &opts)
                })
            }
            EntryCommand::Delete { id, yes } => {
                if !yes && !confirm("Are you sure you want to delete this entry?")? {
                    return view::emit(&cancelled(), json, |_| String::new());
                }
                view::emit(&commands::delete_entry(store, *id), json, |_| {
                    String::new()
                })
            }
        },
        Command::Report(args) => view::emit(
            &commands::generate_report(store, &args.range.request()),
            json,
            |r| view::render_report(r, &opts),
        ),
        Command::Export(args) => view::emit(
            &commands::export_report(
                store,
                config,
                &args.range.request(),
                args.output.clone(),
                today(),
            ),
            json,
            |r| view::render_export(r, &opts),
        ),
        Command::Settings(cmd) => match cmd {
            SettingsCommand::List => {
                view::emit(&commands::list_settings(store), json, view::render_settings)
            }
            SettingsCommand::Get { key } => {
                view::emit(&commands::get_setting(store, key), json, view::render_setting)
            }
            SettingsCommand::Set { key, value } => view::emit(
                &commands::set_setting(store, key, value),
                json,
                |_| String::new(),
            ),
            SettingsCommand::Unset { key } => {
                view::emit(&commands::unset_setting(store, key), json, |_| {
                    String::new()
                })
            }
        },
        Command::Status => view::emit(&commands::get_status(store), json, view::render_status),
    }
}
