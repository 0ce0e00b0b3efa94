/// Project endpoints
///
/// - `POST   /projetos` - Create with responsible users
/// - `GET    /projetos` - List
/// - `GET    /projetos/:id` - Get
/// - `PUT    /projetos/:id` - Update; `responsaveis_id` replaces the set when present
/// - `DELETE /projetos/:id` - Delete with its links

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use projectflow_shared::services::projects::{self, NewProject, ProjectChanges, ProjectWithMembers};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub nome: String,

    #[serde(default)]
    pub descritivo: String,

    #[serde(default)]
    pub responsaveis_id: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub nome: String,

    #[serde(default)]
    pub descritivo: String,

    /// None keeps the current responsible users
    pub responsaveis_id: Option<Vec<Uuid>>,
}

/// A responsible user as embedded in a project
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponsibleResponse {
    pub id: Uuid,
    pub nome: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub nome: String,
    pub descritivo: String,
    pub responsaveis: Vec<ResponsibleResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectWithMembers> for ProjectResponse {
    fn from(value: ProjectWithMembers) -> Self {
        let ProjectWithMembers { project, members } = value;

        Self {
            id: project.id,
            nome: project.name,
            descritivo: project.description,
            responsaveis: members
                .into_iter()
                .map(|m| ResponsibleResponse {
                    id: m.user_id,
                    nome: m.user_name,
                })
                .collect(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Create a project
///
/// # Errors
///
/// - `400 Bad Request`: name taken or unknown responsible user
pub async fn create_project(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    let project = projects::create(
        &state.db,
        NewProject {
            name: req.nome,
            description: req.descritivo,
            member_ids: req.responsaveis_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let projects = projects::list(&state.db).await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

pub async fn get_project(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ProjectResponse>> {
    let project = projects::get(&state.db, id).await?;
    Ok(Json(project.into()))
}

pub async fn update_project(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = projects::update(
        &state.db,
        id,
        ProjectChanges {
            name: req.nome,
            description: req.descritivo,
            member_ids: req.responsaveis_id,
        },
    )
    .await?;

    Ok(Json(project.into()))
}

/// Delete a project
///
/// # Errors
///
/// - `400 Bad Request`: the project still has cycles
/// - `404 Not Found`
pub async fn delete_project(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    projects::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
