/// Phases and their artifacts
///
/// Mirrors [`super::projects`]: the artifact set is written with the phase in
/// one transaction and replaced wholesale on update.
///
/// Deleting a phase removes its artifact links but not the cards that point
/// at it; those keep the stale `phase_id`.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{attach, dedupe_ids};
use crate::error::{ServiceError, ServiceResult};
use crate::models::phase::{Phase, PhaseData};
use crate::models::phase_artifact::PhaseArtifact;

/// A phase with its artifacts
#[derive(Debug, Clone)]
pub struct PhaseWithArtifacts {
    pub phase: Phase,
    pub artifacts: Vec<PhaseArtifact>,
}

/// Input for creating a phase
#[derive(Debug, Clone)]
pub struct NewPhase {
    pub data: PhaseData,
    pub artifact_ids: Vec<Uuid>,
}

/// Input for updating a phase; `artifact_ids: None` keeps the current links
#[derive(Debug, Clone)]
pub struct PhaseChanges {
    pub data: PhaseData,
    pub artifact_ids: Option<Vec<Uuid>>,
}

/// Creates a phase and links its artifacts
///
/// # Errors
///
/// - `Validation` if any artifact does not exist (nothing is written)
pub async fn create(pool: &PgPool, input: NewPhase) -> ServiceResult<PhaseWithArtifacts> {
    let artifact_ids = dedupe_ids(&input.artifact_ids);

    let mut tx = pool.begin().await?;

    let phase = Phase::create(&mut *tx, input.data).await?;
    PhaseArtifact::add_many(&mut *tx, phase.id, &artifact_ids).await?;
    let artifacts = PhaseArtifact::list_for_phases(&mut *tx, &[phase.id]).await?;

    tx.commit().await?;

    info!(phase_id = %phase.id, artifacts = artifacts.len(), "Phase created");
    Ok(PhaseWithArtifacts { phase, artifacts })
}

pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<PhaseWithArtifacts> {
    let phase = Phase::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Phase"))?;

    let artifacts = PhaseArtifact::list_for_phases(pool, &[id]).await?;

    Ok(PhaseWithArtifacts { phase, artifacts })
}

/// Lists phases in lifecycle order
pub async fn list(pool: &PgPool) -> ServiceResult<Vec<PhaseWithArtifacts>> {
    let phases = Phase::list(pool).await?;
    let ids: Vec<Uuid> = phases.iter().map(|p| p.id).collect();
    let artifacts = PhaseArtifact::list_for_phases(pool, &ids).await?;

    Ok(attach(phases, artifacts, |p| p.id, |a| a.phase_id)
        .into_iter()
        .map(|(phase, artifacts)| PhaseWithArtifacts { phase, artifacts })
        .collect())
}

/// Updates a phase, atomically replacing its artifacts when given
///
/// # Errors
///
/// - `NotFound` if the phase does not exist
/// - `Validation` if any artifact does not exist; the previous set is kept
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: PhaseChanges,
) -> ServiceResult<PhaseWithArtifacts> {
    let mut tx = pool.begin().await?;

    let phase = Phase::update(&mut *tx, id, input.data)
        .await?
        .ok_or_else(|| ServiceError::not_found("Phase"))?;

    if let Some(artifact_ids) = input.artifact_ids {
        let artifact_ids = dedupe_ids(&artifact_ids);
        PhaseArtifact::delete_for_phase(&mut *tx, id).await?;
        PhaseArtifact::add_many(&mut *tx, id, &artifact_ids).await?;
    }

    let artifacts = PhaseArtifact::list_for_phases(&mut *tx, &[id]).await?;

    tx.commit().await?;

    info!(phase_id = %id, artifacts = artifacts.len(), "Phase updated");
    Ok(PhaseWithArtifacts { phase, artifacts })
}

/// Deletes a phase after removing its artifact links
pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    PhaseArtifact::delete_for_phase(&mut *tx, id).await?;

    if !Phase::delete(&mut *tx, id).await? {
        return Err(ServiceError::not_found("Phase"));
    }

    tx.commit().await?;

    info!(phase_id = %id, "Phase deleted");
    Ok(())
}
