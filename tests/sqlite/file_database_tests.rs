//! Tests against on-disk databases shared by pooled connections.

use crate::sqlite::helpers::{BoxError, TemporaryDatabaseFile, open_context};
use issueflow::tracking::{
    domain::IssueStatus,
    services::{CreateIssueRequest, TrackingError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn data_survives_reopening_the_database() -> Result<(), BoxError> {
    let file = TemporaryDatabaseFile::new("reopen");
    let issue_id = {
        let ctx = open_context(&file.url(), 2).await?;
        let project = ctx.service.create_project("Website").await?;
        let issue = ctx
            .service
            .create_issue(CreateIssueRequest::new(project.id(), "Fix footer"))
            .await?;
        ctx.service
            .transition_issue(issue.id(), "IN_PROGRESS")
            .await?;
        issue.id()
    };

    let reopened = open_context(&file.url(), 2).await?;
    let issue = reopened.service.get_issue(issue_id).await?;

    assert_eq!(issue.status(), IssueStatus::InProgress);
    assert_eq!(reopened.service.list_projects().await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_transitions_commit_exactly_once() -> Result<(), BoxError> {
    let file = TemporaryDatabaseFile::new("race");
    let ctx = open_context(&file.url(), 4).await?;
    let project = ctx.service.create_project("Website").await?;
    let issue = ctx
        .service
        .create_issue(CreateIssueRequest::new(project.id(), "Fix footer"))
        .await?;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let service = ctx.service.clone();
        let id = issue.id();
        handles.push(tokio::spawn(async move {
            service.transition_issue(id, "IN_PROGRESS").await
        }));
    }

    let mut committed = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => committed += 1,
            Err(TrackingError::Transition(_)) => {}
            Err(other) => return Err(other.into()),
        }
    }

    assert_eq!(committed, 1);
    let stored = ctx.service.get_issue(issue.id()).await?;
    assert_eq!(stored.status(), IssueStatus::InProgress);
    Ok(())
}
