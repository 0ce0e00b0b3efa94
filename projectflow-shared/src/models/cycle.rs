/// Cycle model and database operations
///
/// A cycle is a named, versioned iteration of exactly one project. Cycle names
/// are unique across all projects.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cycles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     version VARCHAR(64) NOT NULL,
///     project_id UUID NOT NULL REFERENCES projects(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT cycles_name_key UNIQUE (name)
/// );
/// ```

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

/// A project cycle
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Cycle {
    pub id: Uuid,
    pub name: String,
    pub version: String,
    pub project_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or fully updating a cycle
#[derive(Debug, Clone)]
pub struct CycleData {
    pub name: String,
    pub version: String,
    pub project_id: Uuid,
}

/// Optional filters for [`Cycle::list`]; absent filters match everything
#[derive(Debug, Clone, Default)]
pub struct CycleFilter {
    pub version: Option<String>,
    pub project_id: Option<Uuid>,
}

impl Cycle {
    /// Inserts a cycle
    ///
    /// Fails with a foreign-key violation if the project does not exist.
    pub async fn create<'e, E>(executor: E, data: CycleData) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cycle>(
            r#"
            INSERT INTO cycles (name, version, project_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, version, project_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.version)
        .bind(data.project_id)
        .fetch_one(executor)
        .await
    }

    /// Finds a cycle by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cycle>(
            r#"
            SELECT id, name, version, project_id, created_at, updated_at
            FROM cycles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a cycle by its unique name
    pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cycle>(
            r#"
            SELECT id, name, version, project_id, created_at, updated_at
            FROM cycles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(executor)
        .await
    }

    /// Checks whether a different cycle already uses `name`
    pub async fn name_taken<'e, E>(
        executor: E,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM cycles
                WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(executor)
        .await
    }

    /// Replaces every column, refreshing `updated_at`
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: CycleData,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cycle>(
            r#"
            UPDATE cycles
            SET name = $2, version = $3, project_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, version, project_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.version)
        .bind(data.project_id)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a cycle
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM cycles WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists cycles matching `filter`, newest first
    pub async fn list<'e, E>(executor: E, filter: &CycleFilter) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Cycle>(
            r#"
            SELECT id, name, version, project_id, created_at, updated_at
            FROM cycles
            WHERE ($1::text IS NULL OR version = $1)
              AND ($2::uuid IS NULL OR project_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.version.as_deref())
        .bind(filter.project_id)
        .fetch_all(executor)
        .await
    }
}
