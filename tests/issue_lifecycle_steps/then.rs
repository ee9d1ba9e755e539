//! Then steps for issue lifecycle BDD scenarios.

use super::world::{IssueLifecycleWorld, run_async};
use issueflow::tracking::{
    domain::IssueStatus,
    services::{TrackingError, TrackingErrorKind},
};
use rstest_bdd_macros::then;

fn parse_status(status: &str) -> Result<IssueStatus, eyre::Report> {
    IssueStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))
}

#[then(r#"the issue status is "{status}""#)]
fn issue_status_is(world: &IssueLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let issue = world.issue()?;
    eyre::ensure!(
        issue.status() == expected,
        "expected status {expected}, found {}",
        issue.status()
    );
    Ok(())
}

#[then(r#"the stored issue status is "{status}""#)]
fn stored_issue_status_is(world: &IssueLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let stored = run_async(world.service.get_issue(world.issue()?.id()))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected stored status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then(r#"the transition is rejected with allowed statuses "{allowed}""#)]
fn transition_rejected_with_allowed(
    world: &IssueLifecycleWorld,
    allowed: String,
) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    let Err(TrackingError::Transition(rejection)) = result else {
        return Err(eyre::eyre!("expected a transition rejection, got {result:?}"));
    };
    let listed: Vec<&str> = rejection.allowed.iter().map(|status| status.as_str()).collect();
    eyre::ensure!(
        listed.join(", ") == allowed,
        "expected allowed statuses {allowed}, found {listed:?}"
    );
    Ok(())
}

#[then("the transition is rejected because the issue is terminal")]
fn transition_rejected_as_terminal(world: &IssueLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    let Err(TrackingError::Transition(rejection)) = result else {
        return Err(eyre::eyre!("expected a transition rejection, got {result:?}"));
    };
    eyre::ensure!(
        rejection.from_terminal_state(),
        "expected a terminal rejection, got {rejection}"
    );
    Ok(())
}

#[then("the request fails validation")]
fn request_fails_validation(world: &IssueLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    let Err(err) = result else {
        return Err(eyre::eyre!("expected a validation failure, got {result:?}"));
    };
    eyre::ensure!(
        err.kind() == TrackingErrorKind::Validation,
        "expected a validation failure, got {err:?}"
    );
    Ok(())
}

#[then(r#"the request fails with message "{message}""#)]
fn request_fails_with_message(
    world: &IssueLifecycleWorld,
    message: String,
) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    let Err(err) = result else {
        return Err(eyre::eyre!("expected a failure, got {result:?}"));
    };
    eyre::ensure!(
        err.to_string() == message,
        "expected message {message:?}, found {:?}",
        err.to_string()
    );
    Ok(())
}

#[then("the project has no issues")]
fn project_has_no_issues(world: &IssueLifecycleWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let issues = run_async(world.service.list_issues(project_id))?;
    eyre::ensure!(issues.is_empty(), "expected no issues, found {}", issues.len());
    Ok(())
}
