/// Card endpoints
///
/// # Endpoints
///
/// - `POST   /card` - Create (every field required)
/// - `GET    /card?status=&ciclo_id=&responsavel_id=` - Filters combine with AND
/// - `GET    /card/:id`
/// - `PATCH  /card/:id` - Partial update; `updated_at` is refreshed even for `{}`
/// - `DELETE /card/:id`
///
/// A card's cycle is fixed at creation: the patch body has no `ciclo_id`.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{IdPath, QueryFilter, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use projectflow_shared::{
    models::card::{Card, CardFilter, CardStatus, CreateCard, UpdateCard},
    services::cards,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    pub status: CardStatus,

    #[validate(range(min = 0.0, message = "Planned hours must be zero or greater"))]
    pub tempo_planejado_horas: f64,

    pub link: String,
    pub descricao: String,
    pub ciclo_id: Uuid,
    pub fase_id: Uuid,
    pub artefato_id: Uuid,
    pub responsavel_id: Uuid,
}

/// Patch body; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCardRequest {
    pub status: Option<CardStatus>,

    #[validate(range(min = 0.0, message = "Planned hours must be zero or greater"))]
    pub tempo_planejado_horas: Option<f64>,

    pub link: Option<String>,
    pub descricao: Option<String>,
    pub fase_id: Option<Uuid>,
    pub artefato_id: Option<Uuid>,
    pub responsavel_id: Option<Uuid>,
}

impl From<UpdateCardRequest> for UpdateCard {
    fn from(req: UpdateCardRequest) -> Self {
        Self {
            status: req.status,
            planned_hours: req.tempo_planejado_horas,
            link: req.link,
            description: req.descricao,
            phase_id: req.fase_id,
            artifact_id: req.artefato_id,
            responsible_id: req.responsavel_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CardQuery {
    pub status: Option<CardStatus>,
    pub ciclo_id: Option<Uuid>,
    pub responsavel_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub status: CardStatus,
    pub tempo_planejado_horas: f64,
    pub link: String,
    pub descricao: String,
    pub ciclo_id: Uuid,
    pub fase_id: Uuid,
    pub artefato_id: Uuid,
    pub responsavel_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            status: card.status,
            tempo_planejado_horas: card.planned_hours,
            link: card.link,
            descricao: card.description,
            ciclo_id: card.cycle_id,
            fase_id: card.phase_id,
            artefato_id: card.artifact_id,
            responsavel_id: card.responsible_id,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

/// Create a card
///
/// # Errors
///
/// - `400 Bad Request`: negative hours or unknown cycle, phase, artifact or user
pub async fn create_card(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCardRequest>,
) -> ApiResult<(StatusCode, Json<CardResponse>)> {
    let card = cards::create(
        &state.db,
        CreateCard {
            status: req.status,
            planned_hours: req.tempo_planejado_horas,
            link: req.link,
            description: req.descricao,
            cycle_id: req.ciclo_id,
            phase_id: req.fase_id,
            artifact_id: req.artefato_id,
            responsible_id: req.responsavel_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(card.into())))
}

pub async fn list_cards(
    State(state): State<AppState>,
    QueryFilter(query): QueryFilter<CardQuery>,
) -> ApiResult<Json<Vec<CardResponse>>> {
    let filter = CardFilter {
        status: query.status,
        cycle_id: query.ciclo_id,
        responsible_id: query.responsavel_id,
    };

    let cards = cards::list(&state.db, &filter).await?;
    Ok(Json(cards.into_iter().map(CardResponse::from).collect()))
}

pub async fn get_card(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<CardResponse>> {
    let card = cards::get(&state.db, id).await?;
    Ok(Json(card.into()))
}

/// Partially update a card
///
/// # Errors
///
/// - `400 Bad Request`: negative hours or unknown phase, artifact or user
/// - `404 Not Found`
pub async fn update_card(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateCardRequest>,
) -> ApiResult<Json<CardResponse>> {
    let card = cards::update(&state.db, id, req.into()).await?;
    Ok(Json(card.into()))
}

pub async fn delete_card(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    cards::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
