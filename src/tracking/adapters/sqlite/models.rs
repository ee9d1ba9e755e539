//! Diesel row models for project and issue persistence.

use super::schema::{issues, projects};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: i64,
    /// Project name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow<'a> {
    /// Project name.
    pub name: &'a str,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for issue records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IssueRow {
    /// Issue identifier.
    pub id: i64,
    /// Owning project identifier.
    pub project_id: i64,
    /// Issue title.
    pub title: String,
    /// Issue description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest status change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for issue records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issues)]
pub struct NewIssueRow<'a> {
    /// Owning project identifier.
    pub project_id: i64,
    /// Issue title.
    pub title: &'a str,
    /// Issue description.
    pub description: &'a str,
    /// Initial lifecycle status.
    pub status: &'static str,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Initial status change timestamp.
    pub updated_at: DateTime<Utc>,
}
