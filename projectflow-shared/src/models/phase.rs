/// Phase model and database operations
///
/// Phases are the ordered steps of the delivery lifecycle (prospecting,
/// analysis, design, ...). Each phase lists the artifacts it produces through
/// [`super::phase_artifact`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE phases (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     position INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

/// A lifecycle phase
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Phase {
    pub id: Uuid,
    pub name: String,
    pub description: String,

    /// Display order within the lifecycle
    pub position: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or fully updating a phase's own columns
#[derive(Debug, Clone)]
pub struct PhaseData {
    pub name: String,
    pub description: String,
    pub position: i32,
}

impl Phase {
    /// Inserts a phase
    pub async fn create<'e, E>(executor: E, data: PhaseData) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Phase>(
            r#"
            INSERT INTO phases (name, description, position)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, position, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.position)
        .fetch_one(executor)
        .await
    }

    /// Finds a phase by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Phase>(
            r#"
            SELECT id, name, description, position, created_at, updated_at
            FROM phases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Checks whether a phase exists
    pub async fn exists<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM phases WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Replaces every column, refreshing `updated_at`
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: PhaseData,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Phase>(
            r#"
            UPDATE phases
            SET name = $2, description = $3, position = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, position, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.position)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a phase row (links must already be gone)
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM phases WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists phases in lifecycle order
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Phase>(
            r#"
            SELECT id, name, description, position, created_at, updated_at
            FROM phases
            ORDER BY position, created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await
    }
}
