//! Issue aggregate, its validated title, and validated status changes.

use super::{IssueId, IssueStatus, ProjectId, TransitionError, ValidationError, validate_transition};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-blank issue title, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueTitle(String);

impl IssueTitle {
    /// Creates a validated issue title.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BlankIssueTitle`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(ValidationError::BlankIssueTitle);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IssueTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for IssueTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issue data awaiting an identifier from the repository.
///
/// New issues always start in [`IssueStatus::Open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    project_id: ProjectId,
    title: IssueTitle,
    description: String,
    created_at: DateTime<Utc>,
}

impl NewIssue {
    /// Prepares an issue for insertion under `project_id`.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        title: IssueTitle,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            project_id,
            title,
            description: description.unwrap_or_default(),
            created_at: clock.utc(),
        }
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the issue title.
    #[must_use]
    pub const fn title(&self) -> &IssueTitle {
        &self.title
    }

    /// Returns the issue description, empty when none was supplied.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status every new issue starts in.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        IssueStatus::Open
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attaches the repository-assigned identifier.
    #[must_use]
    pub fn into_issue(self, id: IssueId) -> Issue {
        Issue {
            id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status: IssueStatus::Open,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Persisted issue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    id: IssueId,
    project_id: ProjectId,
    title: IssueTitle,
    description: String,
    status: IssueStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIssueData {
    /// Persisted issue identifier.
    pub id: IssueId,
    /// Owning project identifier.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: IssueTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: IssueStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest status change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the issue title.
    #[must_use]
    pub const fn title(&self) -> &IssueTitle {
        &self.title
    }

    /// Returns the issue description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest status change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Validates a move to `requested` and describes the write to perform.
    ///
    /// The issue itself is left untouched; the returned [`StatusChange`]
    /// carries the status read here as the compare-and-set precondition.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the lifecycle does not permit the
    /// move.
    pub fn plan_transition(
        &self,
        requested: IssueStatus,
        clock: &impl Clock,
    ) -> Result<StatusChange, TransitionError> {
        validate_transition(self.status, requested)?;
        Ok(StatusChange {
            issue_id: self.id,
            expected: self.status,
            target: requested,
            changed_at: clock.utc(),
        })
    }

    /// Applies a change previously produced by [`Issue::plan_transition`].
    pub(crate) fn apply(&mut self, change: &StatusChange) {
        self.status = change.target;
        self.updated_at = change.changed_at;
    }
}

/// A validated status write guarded by the status it was validated against.
///
/// Only [`Issue::plan_transition`] constructs these, so every persisted
/// status change has passed the lifecycle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    issue_id: IssueId,
    expected: IssueStatus,
    target: IssueStatus,
    changed_at: DateTime<Utc>,
}

impl StatusChange {
    /// Returns the issue being changed.
    #[must_use]
    pub const fn issue_id(&self) -> IssueId {
        self.issue_id
    }

    /// Returns the status the issue must still hold for the write to apply.
    #[must_use]
    pub const fn expected(&self) -> IssueStatus {
        self.expected
    }

    /// Returns the status to write.
    #[must_use]
    pub const fn target(&self) -> IssueStatus {
        self.target
    }

    /// Returns the timestamp recorded as the issue's `updated_at`.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}
