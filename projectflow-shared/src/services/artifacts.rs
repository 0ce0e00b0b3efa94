/// Artifacts

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::artifact::Artifact;
use crate::models::phase_artifact::PhaseArtifact;

fn duplicate_name() -> ServiceError {
    ServiceError::DuplicateKey("An artifact with this name already exists".to_string())
}

/// Creates an artifact
///
/// # Errors
///
/// - `DuplicateKey` if the name is taken
pub async fn create(pool: &PgPool, name: &str) -> ServiceResult<Artifact> {
    let mut tx = pool.begin().await?;

    if Artifact::name_taken(&mut *tx, name, None).await? {
        return Err(duplicate_name());
    }

    let artifact = Artifact::create(&mut *tx, name).await?;

    tx.commit().await?;

    info!(artifact_id = %artifact.id, "Artifact created");
    Ok(artifact)
}

pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<Artifact> {
    Artifact::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Artifact"))
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Artifact>> {
    Ok(Artifact::list(pool).await?)
}

/// Renames an artifact
///
/// # Errors
///
/// - `NotFound` if the artifact does not exist
/// - `DuplicateKey` if another artifact already has the name
pub async fn rename(pool: &PgPool, id: Uuid, name: &str) -> ServiceResult<Artifact> {
    let mut tx = pool.begin().await?;

    if Artifact::find_by_id(&mut *tx, id).await?.is_none() {
        return Err(ServiceError::not_found("Artifact"));
    }

    if Artifact::name_taken(&mut *tx, name, Some(id)).await? {
        return Err(duplicate_name());
    }

    let artifact = Artifact::rename(&mut *tx, id, name)
        .await?
        .ok_or_else(|| ServiceError::not_found("Artifact"))?;

    tx.commit().await?;

    info!(artifact_id = %id, "Artifact renamed");
    Ok(artifact)
}

/// Deletes an artifact and its phase links
///
/// # Errors
///
/// - `NotFound` if the artifact does not exist
/// - `Validation` if cards still reference the artifact
pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    PhaseArtifact::delete_for_artifact(&mut *tx, id).await?;

    if !Artifact::delete(&mut *tx, id)
        .await
        .map_err(ServiceError::from_delete)?
    {
        return Err(ServiceError::not_found("Artifact"));
    }

    tx.commit().await?;

    info!(artifact_id = %id, "Artifact deleted");
    Ok(())
}
