//! Command-line front end for the issue tracker.
//!
//! Usage:
//!
//! ```text
//! issueflow [--config <path>] project create <name>
//! issueflow [--config <path>] project list
//! issueflow [--config <path>] project show <project-id>
//! issueflow [--config <path>] issue create <project-id> <title> [--description <text>]
//! issueflow [--config <path>] issue list <project-id>
//! issueflow [--config <path>] issue show <issue-id>
//! issueflow [--config <path>] issue transition <issue-id> <OPEN|IN_PROGRESS|DONE>
//! ```
//!
//! Every command prints one JSON document to standard output, either
//! `{"ok": true, "data": ...}` or `{"ok": false, "error": "..."}`. Failures
//! exit with a code derived from the error kind:
//!
//! | Kind       | Exit code |
//! |------------|-----------|
//! | validation | 2         |
//! | not found  | 3         |
//! | transition | 4         |
//! | conflict   | 5         |
//! | other      | 1         |

use clap::{Parser, Subcommand};
use issueflow::config::{TrackerConfig, TrackerConfigError};
use issueflow::telemetry::{self, TelemetryError};
use issueflow::tracking::{
    adapters::sqlite::{SqliteTrackingRepository, build_pool},
    domain::{IssueId, ProjectId},
    ports::TrackingRepositoryError,
    services::{CreateIssueRequest, TrackingError, TrackingErrorKind, TrackingService},
};
use mockable::DefaultClock;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;

type Service = TrackingService<SqliteTrackingRepository, DefaultClock>;

#[derive(Debug, Parser)]
#[command(name = "issueflow", version, about = "Track projects and their issues")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage projects.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Manage issues.
    Issue {
        #[command(subcommand)]
        action: IssueAction,
    },
}

#[derive(Debug, Subcommand)]
enum ProjectAction {
    /// Create a project.
    Create {
        /// Unique project name.
        name: String,
    },
    /// List all projects.
    List,
    /// Show one project.
    Show {
        /// Project identifier.
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum IssueAction {
    /// Create an issue under a project.
    Create {
        /// Owning project identifier.
        project_id: i64,
        /// Issue title.
        title: String,
        /// Optional issue description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List the issues of a project.
    List {
        /// Project identifier.
        project_id: i64,
    },
    /// Show one issue.
    Show {
        /// Issue identifier.
        id: i64,
    },
    /// Move an issue to the next status.
    Transition {
        /// Issue identifier.
        id: i64,
        /// Target status.
        status: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] TrackerConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Store(#[from] TrackingRepositoryError),
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Tracking(err) => match err.kind() {
                TrackingErrorKind::Validation => 2,
                TrackingErrorKind::NotFound => 3,
                TrackingErrorKind::Transition => 4,
                TrackingErrorKind::Conflict => 5,
                TrackingErrorKind::Internal => 1,
            },
            _ => 1,
        }
    }
}

#[derive(Serialize)]
struct Success<'a, T: Serialize> {
    ok: bool,
    data: &'a T,
}

#[derive(Serialize)]
struct Failure {
    ok: bool,
    error: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            let failure = Failure {
                ok: false,
                error: err.to_string(),
            };
            if write_json(&failure).is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = TrackerConfig::load(cli.config.as_deref())?;
    telemetry::init_tracing(&settings.log_filter)?;

    let pool = build_pool(&settings.database_url, settings.max_connections)?;
    let repository = SqliteTrackingRepository::new(pool);
    repository.initialize_schema().await?;
    let service = TrackingService::new(Arc::new(repository), Arc::new(DefaultClock));

    match cli.command {
        Command::Project { action } => run_project(&service, action).await,
        Command::Issue { action } => run_issue(&service, action).await,
    }
}

async fn run_project(service: &Service, action: ProjectAction) -> Result<(), CliError> {
    match action {
        ProjectAction::Create { name } => emit(&service.create_project(&name).await?),
        ProjectAction::List => emit(&service.list_projects().await?),
        ProjectAction::Show { id } => emit(&service.get_project(ProjectId::new(id)).await?),
    }
}

async fn run_issue(service: &Service, action: IssueAction) -> Result<(), CliError> {
    match action {
        IssueAction::Create {
            project_id,
            title,
            description,
        } => {
            let mut request = CreateIssueRequest::new(ProjectId::new(project_id), title);
            if let Some(text) = description {
                request = request.with_description(text);
            }
            emit(&service.create_issue(request).await?)
        }
        IssueAction::List { project_id } => {
            emit(&service.list_issues(ProjectId::new(project_id)).await?)
        }
        IssueAction::Show { id } => emit(&service.get_issue(IssueId::new(id)).await?),
        IssueAction::Transition { id, status } => {
            emit(&service.transition_issue(IssueId::new(id), &status).await?)
        }
    }
}

fn emit<T: Serialize>(data: &T) -> Result<(), CliError> {
    write_json(&Success { ok: true, data })
}

fn write_json<T: Serialize>(document: &T) -> Result<(), CliError> {
    let encoded = serde_json::to_string(document)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{encoded}")?;
    Ok(())
}
