//! `SQLite` repository implementation for project and issue storage.

use super::{
    models::{IssueRow, NewIssueRow, NewProjectRow, ProjectRow},
    pool::TrackingSqlitePool,
    schema::{issues, projects},
};
use crate::tracking::{
    domain::{
        Issue, IssueId, IssueStatus, IssueTitle, NewIssue, NewProject, PersistedIssueData, Project,
        ProjectId, ProjectName, StatusChange,
    },
    ports::{TrackingRepository, TrackingRepositoryError, TrackingRepositoryResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use thiserror::Error;

/// Schema applied by [`SqliteTrackingRepository::initialize_schema`].
pub const SCHEMA_SQL: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/migrations/2026-10-19-000000_create_projects_and_issues/up.sql"
));

/// A stored text value that the domain would normalize differently.
#[derive(Debug, Error)]
#[error("stored {field} {stored:?} is not in normalized form")]
struct UnnormalizedValue {
    field: &'static str,
    stored: String,
}

/// `SQLite`-backed tracking repository.
#[derive(Debug, Clone)]
pub struct SqliteTrackingRepository {
    pool: TrackingSqlitePool,
}

impl SqliteTrackingRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: TrackingSqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the project and issue tables when they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingRepositoryError::Persistence`] when the schema
    /// cannot be applied.
    pub async fn initialize_schema(&self) -> TrackingRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(SCHEMA_SQL)
                .map_err(TrackingRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TrackingRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TrackingRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TrackingRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TrackingRepositoryError::persistence)?
    }
}

#[async_trait]
impl TrackingRepository for SqliteTrackingRepository {
    async fn create_project(&self, project: &NewProject) -> TrackingRepositoryResult<Project> {
        let name = project.name().clone();
        let created_at = project.created_at();

        self.run_blocking(move |connection| {
            let new_row = NewProjectRow {
                name: name.as_str(),
                created_at,
            };
            let row = diesel::insert_into(projects::table)
                .values(&new_row)
                .returning(ProjectRow::as_returning())
                .get_result::<ProjectRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TrackingRepositoryError::DuplicateProjectName(name.clone())
                    }
                    _ => TrackingRepositoryError::persistence(err),
                })?;
            row_to_project(row)
        })
        .await
    }

    async fn list_projects(&self) -> TrackingRepositoryResult<Vec<Project>> {
        self.run_blocking(|connection| {
            projects::table
                .order(projects::id.asc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(TrackingRepositoryError::persistence)?
                .into_iter()
                .map(row_to_project)
                .collect()
        })
        .await
    }

    async fn find_project(&self, id: ProjectId) -> TrackingRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.value()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(TrackingRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn create_issue(&self, issue: &NewIssue) -> TrackingRepositoryResult<Issue> {
        let project_id = issue.project_id();
        let title = issue.title().clone();
        let description = issue.description().to_owned();
        let status = issue.status();
        let created_at = issue.created_at();

        self.run_blocking(move |connection| {
            let new_row = NewIssueRow {
                project_id: project_id.value(),
                title: title.as_str(),
                description: &description,
                status: status.as_str(),
                created_at,
                updated_at: created_at,
            };
            let row = diesel::insert_into(issues::table)
                .values(&new_row)
                .returning(IssueRow::as_returning())
                .get_result::<IssueRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TrackingRepositoryError::ProjectNotFound(project_id)
                    }
                    _ => TrackingRepositoryError::persistence(err),
                })?;
            row_to_issue(row)
        })
        .await
    }

    async fn list_issues(&self, project_id: ProjectId) -> TrackingRepositoryResult<Vec<Issue>> {
        self.run_blocking(move |connection| {
            issues::table
                .filter(issues::project_id.eq(project_id.value()))
                .order(issues::id.asc())
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)
                .map_err(TrackingRepositoryError::persistence)?
                .into_iter()
                .map(row_to_issue)
                .collect()
        })
        .await
    }

    async fn find_issue(&self, id: IssueId) -> TrackingRepositoryResult<Option<Issue>> {
        self.run_blocking(move |connection| {
            find_issue_row(connection, id)?
                .map(row_to_issue)
                .transpose()
        })
        .await
    }

    async fn update_issue_status(&self, change: &StatusChange) -> TrackingRepositoryResult<Issue> {
        let change = *change;
        self.run_blocking(move |connection| {
            let issue_id = change.issue_id();
            // The status filter turns the write into a compare-and-set.
            let updated = diesel::update(
                issues::table
                    .filter(issues::id.eq(issue_id.value()))
                    .filter(issues::status.eq(change.expected().as_str())),
            )
            .set((
                issues::status.eq(change.target().as_str()),
                issues::updated_at.eq(change.changed_at()),
            ))
            .returning(IssueRow::as_returning())
            .get_result::<IssueRow>(connection)
            .optional()
            .map_err(TrackingRepositoryError::persistence)?;

            if let Some(row) = updated {
                return row_to_issue(row);
            }

            let current = find_issue_row(connection, issue_id)?
                .ok_or(TrackingRepositoryError::IssueNotFound(issue_id))?;
            Err(TrackingRepositoryError::StatusConflict {
                issue_id,
                expected: change.expected(),
                actual: parse_status(&current.status)?,
            })
        })
        .await
    }
}

fn find_issue_row(
    connection: &mut SqliteConnection,
    id: IssueId,
) -> TrackingRepositoryResult<Option<IssueRow>> {
    issues::table
        .filter(issues::id.eq(id.value()))
        .select(IssueRow::as_select())
        .first::<IssueRow>(connection)
        .optional()
        .map_err(TrackingRepositoryError::persistence)
}

fn parse_status(value: &str) -> TrackingRepositoryResult<IssueStatus> {
    IssueStatus::try_from(value).map_err(TrackingRepositoryError::persistence)
}

fn row_to_project(row: ProjectRow) -> TrackingRepositoryResult<Project> {
    let name = ProjectName::new(row.name.as_str()).map_err(TrackingRepositoryError::persistence)?;
    ensure_normalized("project name", name.as_str(), row.name)?;
    Ok(Project::from_persisted(
        ProjectId::new(row.id),
        name,
        row.created_at,
    ))
}

fn row_to_issue(row: IssueRow) -> TrackingRepositoryResult<Issue> {
    let IssueRow {
        id,
        project_id,
        title: persisted_title,
        description,
        status: persisted_status,
        created_at,
        updated_at,
    } = row;

    let title =
        IssueTitle::new(persisted_title.as_str()).map_err(TrackingRepositoryError::persistence)?;
    ensure_normalized("issue title", title.as_str(), persisted_title)?;
    let status = parse_status(&persisted_status)?;

    Ok(Issue::from_persisted(PersistedIssueData {
        id: IssueId::new(id),
        project_id: ProjectId::new(project_id),
        title,
        description,
        status,
        created_at,
        updated_at,
    }))
}

fn ensure_normalized(
    field: &'static str,
    normalized: &str,
    stored: String,
) -> TrackingRepositoryResult<()> {
    if normalized == stored {
        return Ok(());
    }
    Err(TrackingRepositoryError::persistence(UnnormalizedValue {
        field,
        stored,
    }))
}
