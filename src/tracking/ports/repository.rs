//! Repository port for project and issue persistence.

use crate::tracking::domain::{
    Issue, IssueId, IssueStatus, NewIssue, NewProject, Project, ProjectId, ProjectName,
    StatusChange,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracking repository operations.
pub type TrackingRepositoryResult<T> = Result<T, TrackingRepositoryError>;

/// Project and issue persistence contract.
///
/// Implementations assign identifiers in ascending creation order and return
/// listings sorted by identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingRepository: Send + Sync {
    /// Stores a new project and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingRepositoryError::DuplicateProjectName`] when another
    /// project already uses the name.
    async fn create_project(&self, project: &NewProject) -> TrackingRepositoryResult<Project>;

    /// Returns every project ordered by identifier.
    async fn list_projects(&self) -> TrackingRepositoryResult<Vec<Project>>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_project(&self, id: ProjectId) -> TrackingRepositoryResult<Option<Project>>;

    /// Stores a new issue in [`IssueStatus::Open`] and returns it with its
    /// assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingRepositoryError::ProjectNotFound`] when the owning
    /// project does not exist.
    async fn create_issue(&self, issue: &NewIssue) -> TrackingRepositoryResult<Issue>;

    /// Returns the issues of a project ordered by identifier.
    async fn list_issues(&self, project_id: ProjectId) -> TrackingRepositoryResult<Vec<Issue>>;

    /// Finds an issue by identifier.
    ///
    /// Returns `None` when the issue does not exist.
    async fn find_issue(&self, id: IssueId) -> TrackingRepositoryResult<Option<Issue>>;

    /// Writes a validated status change if the issue still holds the
    /// change's expected status, returning the updated issue.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingRepositoryError::StatusConflict`] when the stored
    /// status no longer matches the expected one, or
    /// [`TrackingRepositoryError::IssueNotFound`] when the issue is gone.
    async fn update_issue_status(&self, change: &StatusChange) -> TrackingRepositoryResult<Issue>;
}

/// Errors returned by tracking repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackingRepositoryError {
    /// A project with the same name already exists.
    #[error("duplicate project name: {0}")]
    DuplicateProjectName(ProjectName),

    /// The referenced project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The referenced issue was not found.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// The issue changed status after it was read.
    #[error("issue {issue_id} status conflict: expected {expected}, found {actual}")]
    StatusConflict {
        /// Issue whose write was rejected.
        issue_id: IssueId,
        /// Status the write was validated against.
        expected: IssueStatus,
        /// Status currently stored.
        actual: IssueStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
