//! Diesel schema for project and issue persistence.

diesel::table! {
    /// Project records.
    projects (id) {
        /// Store-assigned project identifier.
        id -> BigInt,
        /// Unique project name.
        name -> Text,
        /// Creation timestamp.
        created_at -> TimestamptzSqlite,
    }
}

diesel::table! {
    /// Issue records owned by a project.
    issues (id) {
        /// Store-assigned issue identifier.
        id -> BigInt,
        /// Owning project identifier.
        project_id -> BigInt,
        /// Issue title.
        title -> Text,
        /// Issue description, empty when not supplied.
        description -> Text,
        /// Lifecycle status in canonical string form.
        status -> Text,
        /// Creation timestamp.
        created_at -> TimestamptzSqlite,
        /// Latest status change timestamp.
        updated_at -> TimestamptzSqlite,
    }
}

diesel::joinable!(issues -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(issues, projects);
