//! In-memory repository for projects and issues.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::tracking::{
    domain::{Issue, IssueId, NewIssue, NewProject, Project, ProjectId, StatusChange},
    ports::{TrackingRepository, TrackingRepositoryError, TrackingRepositoryResult},
};

/// Thread-safe in-memory tracking repository.
///
/// Identifiers start at 1 and are never reused, mirroring an autoincrement
/// column.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackingRepository {
    state: Arc<RwLock<InMemoryTrackingState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackingState {
    projects: BTreeMap<ProjectId, Project>,
    issues: BTreeMap<IssueId, Issue>,
    last_project_id: i64,
    last_issue_id: i64,
}

impl InMemoryTrackingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackingRepositoryResult<RwLockReadGuard<'_, InMemoryTrackingState>> {
        self.state.read().map_err(|err| {
            TrackingRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TrackingRepositoryResult<RwLockWriteGuard<'_, InMemoryTrackingState>> {
        self.state.write().map_err(|err| {
            TrackingRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TrackingRepository for InMemoryTrackingRepository {
    async fn create_project(&self, project: &NewProject) -> TrackingRepositoryResult<Project> {
        let mut state = self.write()?;
        let name_taken = state
            .projects
            .values()
            .any(|existing| existing.name() == project.name());
        if name_taken {
            return Err(TrackingRepositoryError::DuplicateProjectName(
                project.name().clone(),
            ));
        }

        state.last_project_id += 1;
        let id = ProjectId::new(state.last_project_id);
        let created = project.clone().into_project(id);
        state.projects.insert(id, created.clone());
        Ok(created)
    }

    async fn list_projects(&self) -> TrackingRepositoryResult<Vec<Project>> {
        let state = self.read()?;
        Ok(state.projects.values().cloned().collect())
    }

    async fn find_project(&self, id: ProjectId) -> TrackingRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn create_issue(&self, issue: &NewIssue) -> TrackingRepositoryResult<Issue> {
        let mut state = self.write()?;
        if !state.projects.contains_key(&issue.project_id()) {
            return Err(TrackingRepositoryError::ProjectNotFound(issue.project_id()));
        }

        state.last_issue_id += 1;
        let id = IssueId::new(state.last_issue_id);
        let created = issue.clone().into_issue(id);
        state.issues.insert(id, created.clone());
        Ok(created)
    }

    async fn list_issues(&self, project_id: ProjectId) -> TrackingRepositoryResult<Vec<Issue>> {
        let state = self.read()?;
        Ok(state
            .issues
            .values()
            .filter(|issue| issue.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn find_issue(&self, id: IssueId) -> TrackingRepositoryResult<Option<Issue>> {
        let state = self.read()?;
        Ok(state.issues.get(&id).cloned())
    }

    async fn update_issue_status(&self, change: &StatusChange) -> TrackingRepositoryResult<Issue> {
        let mut state = self.write()?;
        let issue = state
            .issues
            .get_mut(&change.issue_id())
            .ok_or(TrackingRepositoryError::IssueNotFound(change.issue_id()))?;

        if issue.status() != change.expected() {
            return Err(TrackingRepositoryError::StatusConflict {
                issue_id: change.issue_id(),
                expected: change.expected(),
                actual: issue.status(),
            });
        }

        issue.apply(change);
        Ok(issue.clone())
    }
}
