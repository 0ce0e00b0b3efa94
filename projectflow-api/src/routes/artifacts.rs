/// Artifact endpoints: `/artefatos` and `/artefatos/:id`

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use projectflow_shared::{models::artifact::Artifact, services::artifacts};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create and rename request
#[derive(Debug, Deserialize, Validate)]
pub struct ArtifactRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub nome: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactResponse {
    pub id: Uuid,
    pub nome: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Artifact> for ArtifactResponse {
    fn from(artifact: Artifact) -> Self {
        Self {
            id: artifact.id,
            nome: artifact.name,
            created_at: artifact.created_at,
            updated_at: artifact.updated_at,
        }
    }
}

pub async fn create_artifact(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ArtifactRequest>,
) -> ApiResult<(StatusCode, Json<ArtifactResponse>)> {
    let artifact = artifacts::create(&state.db, &req.nome).await?;
    Ok((StatusCode::CREATED, Json(artifact.into())))
}

pub async fn list_artifacts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ArtifactResponse>>> {
    let artifacts = artifacts::list(&state.db).await?;
    Ok(Json(artifacts.into_iter().map(ArtifactResponse::from).collect()))
}

pub async fn get_artifact(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ArtifactResponse>> {
    let artifact = artifacts::get(&state.db, id).await?;
    Ok(Json(artifact.into()))
}

pub async fn update_artifact(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<ArtifactRequest>,
) -> ApiResult<Json<ArtifactResponse>> {
    let artifact = artifacts::rename(&state.db, id, &req.nome).await?;
    Ok(Json(artifact.into()))
}

/// Delete an artifact and its phase links
///
/// # Errors
///
/// - `400 Bad Request`: cards still produce this artifact
/// - `404 Not Found`
pub async fn delete_artifact(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    artifacts::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
