/// Request extractors with uniform 400 rejections
///
/// Axum's stock `Json`, `Path` and `Query` reject with plain-text bodies.
/// These wrappers turn every rejection into an [`ApiError`] so clients always
/// receive `{"detail": ...}`.
///
/// [`OwnedUser`] combines the access guard's [`AuthContext`] with the `:id`
/// path segment and the ownership rule. Being a parts extractor, it runs
/// before any body extractor in the same handler.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Json, Path, Query, Request},
    http::request::Parts,
};
use projectflow_shared::auth::{authorization::assert_owns, middleware::AuthContext};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has passed `validator` checks
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// A single UUID path parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest("Invalid identifier".to_string()))?;

        Ok(IdPath(id))
    }
}

/// Query-string filters
#[derive(Debug, Clone, Default)]
pub struct QueryFilter<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryFilter<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(QueryFilter(value))
    }
}

/// The `:id` of a user route, verified to be the caller's own account
///
/// Rejects with 401 when unauthenticated, 400 for a malformed ID and 403
/// when the ID belongs to someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for OwnedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;
        let IdPath(target) = IdPath::from_request_parts(parts, state).await?;

        assert_owns(auth.user_id, target)?;

        Ok(OwnedUser(target))
    }
}
