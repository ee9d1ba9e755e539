//! Error types for tracking domain validation and lifecycle rules.

use super::IssueStatus;
use std::fmt;
use thiserror::Error;

/// Caller input that is malformed or semantically invalid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The project name is empty after trimming.
    #[error("Project name cannot be blank.")]
    BlankProjectName,

    /// The issue title is empty after trimming.
    #[error("Issue title cannot be blank.")]
    BlankIssueTitle,

    /// Another project already uses the requested name.
    #[error("A project named '{0}' already exists.")]
    DuplicateProjectName(String),

    /// The requested status text does not name a known status.
    #[error("'{0}' is not a valid status. Choose from: {choices}.", choices = StatusList(&IssueStatus::ALL))]
    UnknownStatus(String),
}

/// A well-formed status change rejected by the issue lifecycle.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub struct TransitionError {
    /// Status the issue currently holds.
    pub from: IssueStatus,
    /// Status that was requested.
    pub to: IssueStatus,
    /// Statuses reachable from `from`; empty for terminal states.
    pub allowed: &'static [IssueStatus],
}

impl TransitionError {
    /// Returns `true` when the rejection happened because `from` is terminal.
    #[must_use]
    pub const fn from_terminal_state(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot transition from {} to {}. Allowed: {}.",
            self.from,
            self.to,
            AllowedTargets(self.allowed)
        )
    }
}

/// Error returned while parsing issue statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown issue status: {0}")]
pub struct ParseIssueStatusError(pub String);

impl From<ParseIssueStatusError> for ValidationError {
    fn from(err: ParseIssueStatusError) -> Self {
        Self::UnknownStatus(err.0)
    }
}

struct StatusList<'a>(&'a [IssueStatus]);

impl fmt::Display for StatusList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, status) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            f.write_str(status.as_str())?;
        }
        Ok(())
    }
}

struct AllowedTargets(&'static [IssueStatus]);

impl fmt::Display for AllowedTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none (terminal state, no transitions allowed)");
        }
        StatusList(self.0).fmt(f)
    }
}
