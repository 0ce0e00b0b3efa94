/// Phase ↔ artifact association rows
///
/// Same shape as [`super::project_member`]: composite key
/// `(phase_id, artifact_id)`, no identity of its own.

use sqlx::PgExecutor;
use uuid::Uuid;

/// An artifact as seen from a phase
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PhaseArtifact {
    pub phase_id: Uuid,
    pub artifact_id: Uuid,
    pub artifact_name: String,
}

impl PhaseArtifact {
    /// Links every artifact in `artifact_ids` to the phase with one statement
    pub async fn add_many<'e, E>(
        executor: E,
        phase_id: Uuid,
        artifact_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if artifact_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO phase_artifacts (phase_id, artifact_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(phase_id)
        .bind(artifact_ids)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_for_phase<'e, E>(executor: E, phase_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM phase_artifacts WHERE phase_id = $1")
            .bind(phase_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_for_artifact<'e, E>(
        executor: E,
        artifact_id: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM phase_artifacts WHERE artifact_id = $1")
            .bind(artifact_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Loads the artifacts of several phases at once
    pub async fn list_for_phases<'e, E>(
        executor: E,
        phase_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, PhaseArtifact>(
            r#"
            SELECT pa.phase_id, a.id AS artifact_id, a.name AS artifact_name
            FROM phase_artifacts pa
            JOIN artifacts a ON a.id = pa.artifact_id
            WHERE pa.phase_id = ANY($1)
            ORDER BY pa.phase_id, pa.created_at, a.name
            "#,
        )
        .bind(phase_ids)
        .fetch_all(executor)
        .await
    }
}
