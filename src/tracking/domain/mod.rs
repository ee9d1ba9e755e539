//! Domain model for project and issue tracking.
//!
//! The domain owns the issue lifecycle state machine and the validated value
//! types; persistence and transport concerns stay outside this boundary.

mod error;
mod ids;
mod issue;
mod lifecycle;
mod project;

pub use error::{ParseIssueStatusError, TransitionError, ValidationError};
pub use ids::{IssueId, ProjectId};
pub use issue::{Issue, IssueTitle, NewIssue, PersistedIssueData, StatusChange};
pub use lifecycle::{IssueStatus, validate_transition};
pub use project::{NewProject, Project, ProjectName};
