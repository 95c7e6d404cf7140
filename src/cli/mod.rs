pub mod maintenance;
pub mod output;
pub mod projects;
pub mod timeline;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use maintenance::{process_check_command, process_migrate_command};
use projects::{process_add_command, process_list_command, process_status_command, AddCommand};
use timeline::{process_timeline_command, TimelineCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    activity::GenericIdleDetector,
    project::entities::ProjectStatus,
    storage::Database,
    tracking::run_tick,
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, default_database_path},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Timetree", version, long_about = None)]
#[command(about = "Time tracking for hierarchical projects", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Database file. By default $XDG_STATE_HOME/timetree/db.json or $HOME/.local/state/timetree/db.json"
    )]
    db: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show the project tree with own, aggregated and today's time")]
    List {},
    #[command(about = "Show what was worked on during each hour of a day")]
    Timeline {
        #[command(flatten)]
        command: TimelineCommand,
    },
    #[command(about = "Create a project, optionally nested under another one")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Make a project the active one. The previously active project is paused")]
    Start {
        #[arg(help = "Id, path or title of the project")]
        identifier: String,
    },
    #[command(about = "Pause a project")]
    Pause {
        #[arg(help = "Id, path or title of the project")]
        identifier: String,
    },
    #[command(about = "Mark a project as completed")]
    Complete {
        #[arg(help = "Id, path or title of the project")]
        identifier: String,
    },
    #[command(about = "Archive a project")]
    Archive {
        #[arg(help = "Id, path or title of the project")]
        identifier: String,
    },
    #[command(about = "Set any status of a project")]
    Status {
        #[arg(help = "Id, path or title of the project")]
        identifier: String,
        status: ProjectStatus,
    },
    #[command(
        about = "Record the current slot for the active project. Intended to be run by a scheduler every few minutes"
    )]
    Track {},
    #[command(about = "Check the database for duplicate paths, ids and stale aggregates")]
    Check {},
    #[command(about = "Convert the database to the hierarchical format and recompute aggregates")]
    Migrate {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(
        CLI_PREFIX,
        &create_application_default_path()?.join("logs"),
        logging_level,
        args.log,
    )?;

    let database = Database::new(args.db.map_or_else(default_database_path, Ok)?);
    let today = DefaultClock.now().date_naive();

    match args.commands {
        Commands::List {} => process_list_command(&database, today).await,
        Commands::Timeline { command } => {
            process_timeline_command(&database, command, today).await
        }
        Commands::Add { command } => process_add_command(&database, command).await,
        Commands::Start { identifier } => {
            process_status_command(&database, &identifier, ProjectStatus::Active).await
        }
        Commands::Pause { identifier } => {
            process_status_command(&database, &identifier, ProjectStatus::Paused).await
        }
        Commands::Complete { identifier } => {
            process_status_command(&database, &identifier, ProjectStatus::Completed).await
        }
        Commands::Archive { identifier } => {
            process_status_command(&database, &identifier, ProjectStatus::Archived).await
        }
        Commands::Status { identifier, status } => {
            process_status_command(&database, &identifier, status).await
        }
        Commands::Track {} => {
            let outcome =
                run_tick(&database, &DefaultClock, &mut GenericIdleDetector::new()).await?;
            println!("{}", output::describe_tick(&outcome));
            Ok(())
        }
        Commands::Check {} => process_check_command(&database).await,
        Commands::Migrate {} => process_migrate_command(&database).await,
    }
}
