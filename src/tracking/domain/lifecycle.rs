//! Issue status and the fixed lifecycle transition table.

use super::{ParseIssueStatusError, TransitionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    /// Issue has been filed and work has not started.
    Open,
    /// Issue is being worked on.
    InProgress,
    /// Issue has been resolved.
    Done,
}

/// Allowed next statuses for each status.
///
/// This table is the single source of truth for the lifecycle graph.
const TRANSITIONS: [(IssueStatus, &[IssueStatus]); 3] = [
    (IssueStatus::Open, &[IssueStatus::InProgress]),
    (IssueStatus::InProgress, &[IssueStatus::Done]),
    (IssueStatus::Done, &[]),
];

impl IssueStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns the statuses this status may move to.
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [Self] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, targets)| *targets)
            .unwrap_or_default()
    }

    /// Returns whether moving from `self` to `target` is permitted.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Returns whether no transitions leave this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IssueStatus {
    type Error = ParseIssueStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseIssueStatusError(value.to_owned()))
    }
}

/// Checks a requested status change against the lifecycle table.
///
/// Every status mutation in the crate goes through this function.
///
/// # Errors
///
/// Returns [`TransitionError`] when `requested` is not reachable from
/// `current` in a single step. Self-transitions are never allowed.
pub fn validate_transition(
    current: IssueStatus,
    requested: IssueStatus,
) -> Result<(), TransitionError> {
    if current.can_transition_to(requested) {
        return Ok(());
    }
    Err(TransitionError {
        from: current,
        to: requested,
        allowed: current.allowed_transitions(),
    })
}
