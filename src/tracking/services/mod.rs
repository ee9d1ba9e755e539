//! Application services for project and issue orchestration.

mod orchestration;

pub use orchestration::{
    CreateIssueRequest, MAX_TRANSITION_ATTEMPTS, NotFoundError, TrackingError, TrackingErrorKind,
    TrackingResult, TrackingService,
};
