pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    maintenance,
    prefs::PrefsStore,
    storage::log_store::LogStore,
    tracker::ActiveLogManager,
    utils::{
        clock::DefaultClock,
        dir::application_dir,
        logging::enable_logging,
    },
};

#[derive(Parser, Debug)]
#[command(name = "chron", version, long_about = None)]
#[command(about = "Command line time tracker for disciplines and projects", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Start a new log")]
    Start {
        discipline: String,
        project: String,
        note: Option<String>,
    },
    #[command(about = "Stop the running log and record it")]
    Stop {},
    #[command(about = "Discard the running log without recording it")]
    Cancel {
        #[arg(short, long, help = "Suppress the confirmation message")]
        quiet: bool,
    },
    #[command(about = "Show whether a log is running")]
    Status {},
    #[command(about = "Copy the log collection to a timestamped backup in the save directory")]
    Backup {},
    #[command(about = "Copy the log collection and statistics to a directory")]
    Export { destination: PathBuf },
    #[command(about = "Show the save directory, or change it")]
    Directory { path: Option<PathBuf> },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = application_dir()?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&app_dir, logging_level, args.log)?;

    let prefs = PrefsStore::new(&app_dir);

    // `directory` must work before any save directory is configured.
    if let Commands::Directory { path } = &args.command {
        match path {
            Some(path) => {
                prefs.set_save_dir(path.clone()).await?;
                println!("Save directory updated.");
            }
            None => match prefs.load().await?.save_dir {
                Some(dir) => println!("Save directory is '{}'.", dir.display()),
                None => println!(
                    "No save directory is set. Use 'chron directory <path>' to set one."
                ),
            },
        }
        return Ok(());
    }

    let store = LogStore::new(prefs.save_dir().await?, app_dir);
    store.preflight().await?;

    match args.command {
        Commands::Backup {} => {
            let path = maintenance::backup(&store, &DefaultClock).await?;
            println!("Log file backed up to '{}'.", path.display());
            Ok(())
        }
        Commands::Export { destination } => {
            let report = maintenance::export(&store, &DefaultClock, &destination).await;
            output::print_export(report)
        }
        command => {
            let manager = ActiveLogManager::new(store, Box::new(DefaultClock));
            match command {
                Commands::Start {
                    discipline,
                    project,
                    note,
                } => {
                    let log = manager.start(&discipline, &project, note.as_deref()).await?;
                    println!(
                        "Started new log with discipline '{}' and project '{}'.",
                        log.discipline, log.project
                    );
                }
                Commands::Stop {} => {
                    let report = manager.stop().await?;
                    output::print_stop(&report);
                }
                Commands::Cancel { quiet } => {
                    let discarded = manager.cancel().await?;
                    if !quiet {
                        match discarded {
                            Some(_) => println!("Log cancelled."),
                            None => println!("No log in progress."),
                        }
                    }
                }
                Commands::Status {} => match manager.status().await? {
                    Some(log) => println!(
                        "Log in progress with discipline '{}' and project '{}'.",
                        log.discipline, log.project
                    ),
                    None => println!("No log in progress."),
                },
                Commands::Backup {}
                | Commands::Export { .. }
                | Commands::Directory { .. } => unreachable!("handled above"),
            }
            Ok(())
        }
    }
}
