/// Project ↔ user association rows
///
/// Links have no identity of their own: the composite key is
/// `(project_id, user_id)` and a link lives exactly as long as both parents.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```

use sqlx::PgExecutor;
use uuid::Uuid;

/// A responsible user as seen from a project
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
}

impl ProjectMember {
    /// Links every user in `user_ids` to the project with one statement
    ///
    /// Fails with a foreign-key violation if any user does not exist, in which
    /// case nothing is inserted.
    pub async fn add_many<'e, E>(
        executor: E,
        project_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(project_id)
        .bind(user_ids)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Removes every link of a project
    pub async fn delete_for_project<'e, E>(executor: E, project_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes every link of a user
    pub async fn delete_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM project_members WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Loads the responsible users of several projects at once
    ///
    /// Ordered by project, then by link creation.
    pub async fn list_for_projects<'e, E>(
        executor: E,
        project_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT pm.project_id, u.id AS user_id, u.name AS user_name
            FROM project_members pm
            JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = ANY($1)
            ORDER BY pm.project_id, pm.created_at, u.name
            "#,
        )
        .bind(project_ids)
        .fetch_all(executor)
        .await
    }
}
