//! Constraint enforcement tests for the `SQLite` schema and repository.

use crate::sqlite::helpers::{BoxError, SqliteContext, context};
use diesel::RunQueryDsl;
use issueflow::tracking::{
    domain::{IssueTitle, NewIssue, NewProject, ProjectId, ProjectName, ValidationError},
    ports::{TrackingRepository, TrackingRepositoryError},
    services::{CreateIssueRequest, TrackingError},
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_name_maps_to_domain_error(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let name = ProjectName::new("Alpha")?;
    ctx.repository
        .create_project(&NewProject::new(name.clone(), &DefaultClock))
        .await?;

    let result = ctx
        .repository
        .create_project(&NewProject::new(name.clone(), &DefaultClock))
        .await;

    assert!(
        matches!(&result, Err(TrackingRepositoryError::DuplicateProjectName(taken)) if *taken == name),
        "expected DuplicateProjectName, got {result:?}"
    );
    assert_eq!(ctx.repository.list_projects().await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn service_reports_duplicate_as_validation(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    ctx.service.create_project("Alpha").await?;

    let result = ctx.service.create_project("Alpha").await;

    assert!(matches!(
        result,
        Err(TrackingError::Validation(ValidationError::DuplicateProjectName(_)))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_key_rejects_orphan_issue(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let orphan = NewIssue::new(
        ProjectId::new(77),
        IssueTitle::new("Orphan")?,
        None,
        &DefaultClock,
    );

    let result = ctx.repository.create_issue(&orphan).await;

    assert!(
        matches!(result, Err(TrackingRepositoryError::ProjectNotFound(id)) if id == ProjectId::new(77)),
        "expected ProjectNotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_issues(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let project = ctx.service.create_project("Website").await?;
    let issue = ctx
        .service
        .create_issue(CreateIssueRequest::new(project.id(), "Fix footer"))
        .await?;

    {
        let mut connection = ctx.pool.get()?;
        diesel::sql_query("DELETE FROM projects WHERE id = 1").execute(&mut connection)?;
    }

    assert!(ctx.repository.find_issue(issue.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[case("UPDATE issues SET status = 'CANCELLED' WHERE id = 1")]
#[case("UPDATE issues SET status = 'open' WHERE id = 1")]
#[case("UPDATE issues SET title = '   ' WHERE id = 1")]
#[case("INSERT INTO projects (name, created_at) VALUES ('', '2026-01-01T00:00:00Z')")]
#[tokio::test(flavor = "multi_thread")]
async fn schema_checks_reject_invalid_rows(
    #[future] context: Result<SqliteContext, BoxError>,
    #[case] statement: &str,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let project = ctx.service.create_project("Website").await?;
    ctx.service
        .create_issue(CreateIssueRequest::new(project.id(), "Fix footer"))
        .await?;

    let result = {
        let mut connection = ctx.pool.get()?;
        diesel::sql_query(statement).execute(&mut connection)
    };

    assert!(result.is_err(), "statement should violate a check: {statement}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schema_initialization_is_idempotent(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    ctx.service.create_project("Website").await?;

    ctx.repository.initialize_schema().await?;

    assert_eq!(ctx.service.list_projects().await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn padded_stored_project_name_is_a_persistence_error(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    {
        let mut connection = ctx.pool.get()?;
        diesel::sql_query(
            "INSERT INTO projects (name, created_at) VALUES (' Padded ', '2026-01-01T00:00:00Z')",
        )
        .execute(&mut connection)?;
    }

    let listed = ctx.repository.list_projects().await;
    let found = ctx.repository.find_project(ProjectId::new(1)).await;

    assert!(
        matches!(listed, Err(TrackingRepositoryError::Persistence(_))),
        "expected a persistence error, got {listed:?}"
    );
    assert!(
        matches!(found, Err(TrackingRepositoryError::Persistence(_))),
        "expected a persistence error, got {found:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn padded_stored_issue_title_is_a_persistence_error(
    #[future] context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let project = ctx.service.create_project("Website").await?;
    let issue = ctx
        .service
        .create_issue(CreateIssueRequest::new(project.id(), "Fix footer"))
        .await?;
    {
        let mut connection = ctx.pool.get()?;
        diesel::sql_query("UPDATE issues SET title = ' Fix footer' WHERE id = 1")
            .execute(&mut connection)?;
    }

    let found = ctx.repository.find_issue(issue.id()).await;
    let listed = ctx.repository.list_issues(project.id()).await;

    assert!(
        matches!(found, Err(TrackingRepositoryError::Persistence(_))),
        "expected a persistence error, got {found:?}"
    );
    assert!(
        matches!(listed, Err(TrackingRepositoryError::Persistence(_))),
        "expected a persistence error, got {listed:?}"
    );
    Ok(())
}
