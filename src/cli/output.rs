//! User-facing rendering of command outcomes. Errors carried inside
//! reports are printed here; errors that abort a command bubble out of
//! [run_cli](super::run_cli) and are rendered by their `Display` impls.

use anyhow::Result;

use crate::{maintenance::ExportReport, tracker::StopReport};

pub fn print_stop(report: &StopReport) {
    let seconds = report.entry.duration_seconds;
    if seconds == 1 {
        println!("Log complete. Tracked {seconds} second.");
    } else {
        println!("Log complete. Tracked {seconds} seconds.");
    }

    // The entry is already durable at this point; a stats failure is
    // only worth a notice.
    if let Err(e) = &report.stats {
        eprintln!("Unable to update statistics file: {e}");
    }
}

/// Prints per-file outcomes and fails the command if either copy failed.
pub fn print_export(report: ExportReport) -> Result<()> {
    match &report.data {
        Ok(path) => println!("Data file exported to '{}'.", path.display()),
        Err(e) => eprintln!("Unable to export data: {e}"),
    }
    match &report.stats {
        Ok(path) => println!("Stats file exported to '{}'.", path.display()),
        Err(e) => eprintln!("Unable to export stats: {e}"),
    }

    report.data?;
    report.stats?;
    Ok(())
}
