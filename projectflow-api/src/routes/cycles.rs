/// Cycle endpoints
///
/// - `POST   /ciclos`
/// - `GET    /ciclos?versao=&projeto_id=`
/// - `GET    /ciclos/projeto/:projeto_id`
/// - `GET    /ciclos/nome/:nome`
/// - `GET    /ciclos/:id`
/// - `PUT    /ciclos/:id`
/// - `DELETE /ciclos/:id`

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{IdPath, QueryFilter, ValidatedJson},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use projectflow_shared::{
    models::cycle::{Cycle, CycleData, CycleFilter},
    services::cycles,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create and full-replace request
#[derive(Debug, Deserialize, Validate)]
pub struct CycleRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub nome: String,

    #[validate(length(min = 1, max = 50, message = "Version must not be empty"))]
    pub versao: String,

    pub projeto_id: Uuid,
}

impl From<CycleRequest> for CycleData {
    fn from(req: CycleRequest) -> Self {
        Self {
            name: req.nome,
            version: req.versao,
            project_id: req.projeto_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CycleQuery {
    pub versao: Option<String>,
    pub projeto_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CycleResponse {
    pub id: Uuid,
    pub nome: String,
    pub versao: String,
    pub projeto_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Cycle> for CycleResponse {
    fn from(cycle: Cycle) -> Self {
        Self {
            id: cycle.id,
            nome: cycle.name,
            versao: cycle.version,
            projeto_id: cycle.project_id,
            created_at: cycle.created_at,
            updated_at: cycle.updated_at,
        }
    }
}

fn to_responses(cycles: Vec<Cycle>) -> Json<Vec<CycleResponse>> {
    Json(cycles.into_iter().map(CycleResponse::from).collect())
}

/// Create a cycle
///
/// # Errors
///
/// - `400 Bad Request`: name taken or unknown project
pub async fn create_cycle(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CycleRequest>,
) -> ApiResult<(StatusCode, Json<CycleResponse>)> {
    let cycle = cycles::create(&state.db, req.into()).await?;
    Ok((StatusCode::CREATED, Json(cycle.into())))
}

pub async fn list_cycles(
    State(state): State<AppState>,
    QueryFilter(query): QueryFilter<CycleQuery>,
) -> ApiResult<Json<Vec<CycleResponse>>> {
    let filter = CycleFilter {
        version: query.versao,
        project_id: query.projeto_id,
    };

    Ok(to_responses(cycles::list(&state.db, &filter).await?))
}

pub async fn list_cycles_for_project(
    State(state): State<AppState>,
    IdPath(project_id): IdPath,
) -> ApiResult<Json<Vec<CycleResponse>>> {
    let filter = CycleFilter {
        project_id: Some(project_id),
        ..Default::default()
    };

    Ok(to_responses(cycles::list(&state.db, &filter).await?))
}

pub async fn get_cycle_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<CycleResponse>> {
    let cycle = cycles::get_by_name(&state.db, &name).await?;
    Ok(Json(cycle.into()))
}

pub async fn get_cycle(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<CycleResponse>> {
    let cycle = cycles::get(&state.db, id).await?;
    Ok(Json(cycle.into()))
}

pub async fn update_cycle(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<CycleRequest>,
) -> ApiResult<Json<CycleResponse>> {
    let cycle = cycles::update(&state.db, id, req.into()).await?;
    Ok(Json(cycle.into()))
}

/// Delete a cycle
///
/// # Errors
///
/// - `400 Bad Request`: cards still belong to the cycle
pub async fn delete_cycle(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    cycles::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
