/// Phase endpoints
///
/// - `POST   /fases`
/// - `GET    /fases` - Ordered by `ordem`
/// - `GET    /fases/:id`
/// - `PUT    /fases/:id` - `artefatos_id` replaces the set when present
/// - `DELETE /fases/:id` - Cards pointing at the phase are left as they are

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use projectflow_shared::{
    models::phase::PhaseData,
    services::phases::{self, NewPhase, PhaseChanges, PhaseWithArtifacts},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePhaseRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub nome: String,

    #[serde(default)]
    pub descritivo: String,

    pub ordem: i32,

    #[serde(default)]
    pub artefatos_id: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePhaseRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub nome: String,

    #[serde(default)]
    pub descritivo: String,

    pub ordem: i32,

    pub artefatos_id: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhaseArtifactResponse {
    pub id: Uuid,
    pub nome: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhaseResponse {
    pub id: Uuid,
    pub nome: String,
    pub descritivo: String,
    pub ordem: i32,
    pub artefatos: Vec<PhaseArtifactResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PhaseWithArtifacts> for PhaseResponse {
    fn from(value: PhaseWithArtifacts) -> Self {
        let PhaseWithArtifacts { phase, artifacts } = value;

        Self {
            id: phase.id,
            nome: phase.name,
            descritivo: phase.description,
            ordem: phase.position,
            artefatos: artifacts
                .into_iter()
                .map(|a| PhaseArtifactResponse {
                    id: a.artifact_id,
                    nome: a.artifact_name,
                })
                .collect(),
            created_at: phase.created_at,
            updated_at: phase.updated_at,
        }
    }
}

/// Create a phase
///
/// # Errors
///
/// - `400 Bad Request`: unknown artifact
pub async fn create_phase(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePhaseRequest>,
) -> ApiResult<(StatusCode, Json<PhaseResponse>)> {
    let phase = phases::create(
        &state.db,
        NewPhase {
            data: PhaseData {
                name: req.nome,
                description: req.descritivo,
                position: req.ordem,
            },
            artifact_ids: req.artefatos_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(phase.into())))
}

pub async fn list_phases(State(state): State<AppState>) -> ApiResult<Json<Vec<PhaseResponse>>> {
    let phases = phases::list(&state.db).await?;
    Ok(Json(phases.into_iter().map(PhaseResponse::from).collect()))
}

pub async fn get_phase(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<PhaseResponse>> {
    let phase = phases::get(&state.db, id).await?;
    Ok(Json(phase.into()))
}

pub async fn update_phase(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdatePhaseRequest>,
) -> ApiResult<Json<PhaseResponse>> {
    let phase = phases::update(
        &state.db,
        id,
        PhaseChanges {
            data: PhaseData {
                name: req.nome,
                description: req.descritivo,
                position: req.ordem,
            },
            artifact_ids: req.artefatos_id,
        },
    )
    .await?;

    Ok(Json(phase.into()))
}

pub async fn delete_phase(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    phases::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
