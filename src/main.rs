// ABOUTME: Entry point for the Time Tracker application
// ABOUTME: Calls the library run function and turns its outcome into an exit code

use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let ok = time_tracker_lib::run()?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
