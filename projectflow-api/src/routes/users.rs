/// User endpoints
///
/// - `POST   /usuarios/registro` - Register (public)
/// - `POST   /usuarios/login` - Exchange email + password for a token (public)
/// - `GET    /usuarios/me` - The caller's own account
/// - `GET    /usuarios` - All accounts
/// - `GET    /usuarios/:id` - One account
/// - `PUT    /usuarios/:id` - Update own account
/// - `DELETE /usuarios/:id` - Delete own account
///
/// The password hash never leaves the server: responses are built from
/// [`UserResponse`], which has no credential field.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{IdPath, OwnedUser, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use projectflow_shared::{
    auth::{authenticator::authenticate, middleware::AuthContext},
    models::user::User,
    services::users::{self, ProfileUpdate, Registration},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub nome: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub senha: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    pub senha: String,
}

/// Update request; `senha` is optional and re-hashed when present
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub nome: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub senha: Option<String>,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always `bearer`
    pub token_type: String,
}

/// Public view of a user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nome: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or email already registered
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = users::register(
        &state.db,
        Registration {
            name: req.nome,
            email: req.email,
            password: req.senha,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (same message)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = authenticate(&state.db, &req.email, &req.senha).await?;
    let access_token = state.tokens.issue(user.id)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// The authenticated user's own account
pub async fn me(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Json<UserResponse>> {
    let user = users::get(&state.db, auth.user_id).await?;
    Ok(Json(user.into()))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = users::list(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let user = users::get(&state.db, id).await?;
    Ok(Json(user.into()))
}

/// Update the caller's own account
///
/// # Errors
///
/// - `403 Forbidden`: the ID is someone else's (checked before the body)
/// - `400 Bad Request`: validation failed or email taken by another user
/// - `404 Not Found`: the account no longer exists
pub async fn update_user(
    State(state): State<AppState>,
    OwnedUser(id): OwnedUser,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = users::update(
        &state.db,
        id,
        ProfileUpdate {
            name: req.nome,
            email: req.email,
            password: req.senha,
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// Delete the caller's own account
///
/// # Errors
///
/// - `403 Forbidden`: the ID is someone else's
/// - `400 Bad Request`: cards are still assigned to the user
pub async fn delete_user(
    State(state): State<AppState>,
    OwnedUser(id): OwnedUser,
) -> ApiResult<StatusCode> {
    users::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_has_no_credential() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();

        assert_eq!(keys.len(), 5);
        assert_eq!(json["nome"], "Alice");
        assert!(json.get("senha").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_update_request_password_optional() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"nome": "A", "email": "a@example.com"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.senha.is_none());

        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"nome": "A", "email": "a@example.com", "senha": "123"}"#)
                .unwrap();
        assert!(req.validate().is_err());
    }
}
