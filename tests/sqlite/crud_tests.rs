//! Creation, lookup, and listing tests for the `SQLite` repository.

use crate::sqlite::helpers::{BoxError, SqliteContext, context};
use issueflow::tracking::{
    domain::{IssueId, IssueStatus, IssueTitle, NewIssue, NewProject, ProjectId, ProjectName},
    ports::TrackingRepository,
    services::CreateIssueRequest,
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_project_round_trips(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let new_project = NewProject::new(ProjectName::new("Website")?, &DefaultClock);

    let created = ctx.repository.create_project(&new_project).await?;
    let found = ctx
        .repository
        .find_project(created.id())
        .await?
        .ok_or("project missing after insert")?;

    assert_eq!(created.id(), ProjectId::new(1));
    assert_eq!(found, created);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_rows_are_none(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;

    assert!(ctx.repository.find_project(ProjectId::new(1)).await?.is_none());
    assert!(ctx.repository.find_issue(IssueId::new(1)).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_issue_round_trips_with_timestamps(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let project = ctx
        .repository
        .create_project(&NewProject::new(ProjectName::new("Website")?, &DefaultClock))
        .await?;
    let new_issue = NewIssue::new(
        project.id(),
        IssueTitle::new("Fix footer")?,
        Some("Links overflow".to_owned()),
        &DefaultClock,
    );

    let created = ctx.repository.create_issue(&new_issue).await?;
    let found = ctx
        .repository
        .find_issue(created.id())
        .await?
        .ok_or("issue missing after insert")?;

    assert_eq!(found, created);
    assert_eq!(found.status(), IssueStatus::Open);
    assert_eq!(found.description(), "Links overflow");
    assert_eq!(found.created_at(), new_issue.created_at());
    assert_eq!(found.updated_at(), found.created_at());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_follow_creation_order(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let website = ctx.service.create_project("Website").await?;
    let mobile = ctx.service.create_project("Mobile").await?;
    let archive = ctx.service.create_project("Archive").await?;
    for (project, title) in [
        (mobile.id(), "Crash on launch"),
        (website.id(), "Fix footer"),
        (mobile.id(), "Dark mode"),
    ] {
        ctx.service
            .create_issue(CreateIssueRequest::new(project, title))
            .await?;
    }

    let project_names: Vec<String> = ctx
        .service
        .list_projects()
        .await?
        .iter()
        .map(|project| project.name().as_str().to_owned())
        .collect();
    let mobile_titles: Vec<String> = ctx
        .service
        .list_issues(mobile.id())
        .await?
        .iter()
        .map(|issue| issue.title().as_str().to_owned())
        .collect();

    assert_eq!(project_names, ["Website", "Mobile", "Archive"]);
    assert_eq!(mobile_titles, ["Crash on launch", "Dark mode"]);
    assert!(ctx.service.list_issues(archive.id()).await?.is_empty());
    Ok(())
}
