/// Project cycles
///
/// Cycle names are unique across all projects.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::cycle::{Cycle, CycleData, CycleFilter};

fn duplicate_name() -> ServiceError {
    ServiceError::DuplicateKey("A cycle with this name already exists".to_string())
}

/// Creates a cycle
///
/// # Errors
///
/// - `DuplicateKey` if the name is taken
/// - `Validation` if the project does not exist
pub async fn create(pool: &PgPool, data: CycleData) -> ServiceResult<Cycle> {
    let mut tx = pool.begin().await?;

    if Cycle::name_taken(&mut *tx, &data.name, None).await? {
        return Err(duplicate_name());
    }

    let cycle = Cycle::create(&mut *tx, data).await?;

    tx.commit().await?;

    info!(cycle_id = %cycle.id, project_id = %cycle.project_id, "Cycle created");
    Ok(cycle)
}

pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<Cycle> {
    Cycle::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Cycle"))
}

/// Looks a cycle up by its unique name
pub async fn get_by_name(pool: &PgPool, name: &str) -> ServiceResult<Cycle> {
    Cycle::find_by_name(pool, name)
        .await?
        .ok_or_else(|| ServiceError::not_found("Cycle"))
}

pub async fn list(pool: &PgPool, filter: &CycleFilter) -> ServiceResult<Vec<Cycle>> {
    Ok(Cycle::list(pool, filter).await?)
}

/// Replaces every field of a cycle
///
/// # Errors
///
/// - `NotFound` if the cycle does not exist
/// - `DuplicateKey` if another cycle already has the new name
/// - `Validation` if the project does not exist
pub async fn update(pool: &PgPool, id: Uuid, data: CycleData) -> ServiceResult<Cycle> {
    let mut tx = pool.begin().await?;

    if Cycle::find_by_id(&mut *tx, id).await?.is_none() {
        return Err(ServiceError::not_found("Cycle"));
    }

    if Cycle::name_taken(&mut *tx, &data.name, Some(id)).await? {
        return Err(duplicate_name());
    }

    let cycle = Cycle::update(&mut *tx, id, data)
        .await?
        .ok_or_else(|| ServiceError::not_found("Cycle"))?;

    tx.commit().await?;

    info!(cycle_id = %id, "Cycle updated");
    Ok(cycle)
}

/// Deletes a cycle
///
/// # Errors
///
/// - `NotFound` if the cycle does not exist
/// - `Validation` if cards still reference the cycle
pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    if !Cycle::delete(pool, id)
        .await
        .map_err(ServiceError::from_delete)?
    {
        return Err(ServiceError::not_found("Cycle"));
    }

    info!(cycle_id = %id, "Cycle deleted");
    Ok(())
}
