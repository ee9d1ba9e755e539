//! Service layer orchestrating project and issue operations.
//!
//! Every status mutation flows through [`TrackingService::transition_issue`],
//! which validates against the persisted status and commits with a
//! compare-and-set so concurrent requests cannot apply against a stale read.

use crate::tracking::{
    domain::{
        Issue, IssueId, IssueStatus, IssueTitle, NewIssue, NewProject, Project, ProjectId,
        ProjectName, TransitionError, ValidationError,
    },
    ports::{TrackingRepository, TrackingRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Number of compare-and-set attempts before a transition reports a conflict.
pub const MAX_TRANSITION_ATTEMPTS: usize = 3;

/// Request payload for creating an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
}

impl CreateIssueRequest {
    /// Creates a request with the required issue fields.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
        }
    }

    /// Sets the issue description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A referenced entity does not exist.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum NotFoundError {
    /// No project has the identifier.
    #[error("Project {0} not found.")]
    Project(ProjectId),
    /// No issue has the identifier.
    #[error("Issue {0} not found.")]
    Issue(IssueId),
}

/// Transport-neutral classification of a [`TrackingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingErrorKind {
    /// Caller input was malformed or invalid.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The lifecycle rejected a well-formed transition.
    Transition,
    /// Concurrent writers kept winning; the request may be retried.
    Conflict,
    /// Storage failed.
    Internal,
}

/// Service-level errors for tracking operations.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A referenced entity is missing.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    /// The issue lifecycle rejected the transition.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// The issue kept changing underneath the transition.
    #[error("Issue {issue_id} was modified concurrently; retry the transition.")]
    Conflict {
        /// Issue whose transition could not be committed.
        issue_id: IssueId,
    },
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TrackingRepositoryError),
}

impl TrackingError {
    /// Returns the transport-neutral classification of this error.
    #[must_use]
    pub const fn kind(&self) -> TrackingErrorKind {
        match self {
            Self::Validation(_) => TrackingErrorKind::Validation,
            Self::NotFound(_) => TrackingErrorKind::NotFound,
            Self::Transition(_) => TrackingErrorKind::Transition,
            Self::Conflict { .. } => TrackingErrorKind::Conflict,
            Self::Repository(_) => TrackingErrorKind::Internal,
        }
    }
}

/// Result type for tracking service operations.
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Project and issue orchestration service.
pub struct TrackingService<R, C>
where
    R: TrackingRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TrackingService<R, C>
where
    R: TrackingRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TrackingService<R, C>
where
    R: TrackingRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new tracking service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a project with a unique, non-blank name.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Validation`] when the name is blank or
    /// already taken, or [`TrackingError::Repository`] when persistence
    /// fails.
    pub async fn create_project(&self, name: &str) -> TrackingResult<Project> {
        let project_name = ProjectName::new(name)?;
        let new_project = NewProject::new(project_name, &*self.clock);
        let project = self
            .repository
            .create_project(&new_project)
            .await
            .map_err(|err| match err {
                TrackingRepositoryError::DuplicateProjectName(taken) => {
                    debug!(name = %taken, "rejected duplicate project name");
                    TrackingError::Validation(ValidationError::DuplicateProjectName(
                        taken.as_str().to_owned(),
                    ))
                }
                other => TrackingError::Repository(other),
            })?;
        info!(project_id = %project.id(), name = %project.name(), "created project");
        Ok(project)
    }

    /// Returns every project in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Repository`] when persistence fails.
    pub async fn list_projects(&self) -> TrackingResult<Vec<Project>> {
        Ok(self.repository.list_projects().await?)
    }

    /// Returns the project with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when no project has the
    /// identifier.
    pub async fn get_project(&self, project_id: ProjectId) -> TrackingResult<Project> {
        self.repository
            .find_project(project_id)
            .await?
            .ok_or(TrackingError::NotFound(NotFoundError::Project(project_id)))
    }

    /// Creates an open issue under an existing project.
    ///
    /// The title is validated before the project is looked up, and the
    /// project is looked up before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Validation`] for a blank title,
    /// [`TrackingError::NotFound`] when the project does not exist, or
    /// [`TrackingError::Repository`] when persistence fails.
    pub async fn create_issue(&self, request: CreateIssueRequest) -> TrackingResult<Issue> {
        let CreateIssueRequest {
            project_id,
            title,
            description,
        } = request;
        let issue_title = IssueTitle::new(title)?;
        self.get_project(project_id).await?;

        let new_issue = NewIssue::new(project_id, issue_title, description, &*self.clock);
        let issue = self
            .repository
            .create_issue(&new_issue)
            .await
            .map_err(|err| match err {
                TrackingRepositoryError::ProjectNotFound(missing) => {
                    TrackingError::NotFound(NotFoundError::Project(missing))
                }
                other => TrackingError::Repository(other),
            })?;
        info!(
            issue_id = %issue.id(),
            project_id = %project_id,
            "created issue"
        );
        Ok(issue)
    }

    /// Returns the issues of a project in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when the project does not exist.
    pub async fn list_issues(&self, project_id: ProjectId) -> TrackingResult<Vec<Issue>> {
        self.get_project(project_id).await?;
        Ok(self.repository.list_issues(project_id).await?)
    }

    /// Returns the issue with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when no issue has the identifier.
    pub async fn get_issue(&self, issue_id: IssueId) -> TrackingResult<Issue> {
        self.repository
            .find_issue(issue_id)
            .await?
            .ok_or(TrackingError::NotFound(NotFoundError::Issue(issue_id)))
    }

    /// Moves an issue to the status named by `requested_status`.
    ///
    /// The issue's existence is checked first, then the status text is
    /// parsed, then the move is validated against the stored status and
    /// committed only if that status is still current. A lost race is
    /// re-validated against the fresh status.
    ///
    /// The lifecycle is a single chain, so a status that really moved fails
    /// re-validation with [`TrackingError::Transition`]. A retry only commits
    /// when the store reported a conflict while the status was unchanged, and
    /// only such repeated reports end in [`TrackingError::Conflict`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when the issue does not exist,
    /// [`TrackingError::Validation`] when the status text is not a known
    /// status, [`TrackingError::Transition`] when the lifecycle forbids the
    /// move, [`TrackingError::Conflict`] when concurrent writers won
    /// [`MAX_TRANSITION_ATTEMPTS`] times in a row, or
    /// [`TrackingError::Repository`] when persistence fails.
    pub async fn transition_issue(
        &self,
        issue_id: IssueId,
        requested_status: &str,
    ) -> TrackingResult<Issue> {
        let mut issue = self.get_issue(issue_id).await?;
        let requested = IssueStatus::try_from(requested_status).map_err(ValidationError::from)?;

        for attempt in 1..=MAX_TRANSITION_ATTEMPTS {
            let change = issue
                .plan_transition(requested, &*self.clock)
                .inspect_err(|err| debug!(issue_id = %issue_id, %err, "rejected transition"))?;

            match self.repository.update_issue_status(&change).await {
                Ok(updated) => {
                    info!(
                        issue_id = %issue_id,
                        from = %change.expected(),
                        to = %change.target(),
                        "transitioned issue"
                    );
                    return Ok(updated);
                }
                Err(TrackingRepositoryError::StatusConflict { actual, .. }) => {
                    warn!(
                        issue_id = %issue_id,
                        attempt,
                        expected = %change.expected(),
                        actual = %actual,
                        "issue status changed during transition; re-validating"
                    );
                    issue = self.get_issue(issue_id).await?;
                }
                Err(TrackingRepositoryError::IssueNotFound(missing)) => {
                    return Err(TrackingError::NotFound(NotFoundError::Issue(missing)));
                }
                Err(other) => return Err(TrackingError::Repository(other)),
            }
        }

        Err(TrackingError::Conflict { issue_id })
    }
}
