/// Bearer-token access guard for Axum
///
/// [`jwt_auth_middleware`] reads `Authorization: Bearer <token>`, decodes it
/// with the shared [`TokenCodec`] and stores an [`AuthContext`] in the request
/// extensions. The token's subject is trusted as-is; the user row is not
/// re-read on each request.
///
/// Every rejection is a 401 with a `{"detail": ...}` body and a
/// `WWW-Authenticate: Bearer` header.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Router};
/// use chrono::Duration;
/// use projectflow_shared::auth::jwt::TokenCodec;
/// use projectflow_shared::auth::middleware::{jwt_auth_middleware, AuthContext};
///
/// async fn me(auth: AuthContext) -> String {
///     auth.user_id.to_string()
/// }
///
/// let codec = Arc::new(TokenCodec::hs256("your-secret-key-at-least-32-bytes", Duration::minutes(30)));
/// let app: Router = Router::new()
///     .route("/me", get(me))
///     .route_layer(middleware::from_fn_with_state(codec, jwt_auth_middleware));
/// ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::jwt::{JwtError, TokenCodec};

/// The authenticated subject of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

/// Why a request was not authenticated
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Not authenticated")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header")]
    InvalidFormat,

    /// Token malformed, badly signed or expired
    #[error("Could not validate credentials")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let mut response = (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": self.to_string() })),
        )
            .into_response();

        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));

        response
    }
}

/// Resolves the subject of a request from its headers
///
/// # Errors
///
/// - `MissingCredentials` if there is no Authorization header
/// - `InvalidFormat` if the scheme is not Bearer or the token is empty
/// - `InvalidToken` if decoding fails for any reason
pub fn resolve_subject(headers: &HeaderMap, codec: &TokenCodec) -> Result<Uuid, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidFormat)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }

    let claims = codec.decode(token).map_err(|e| {
        match &e {
            JwtError::Expired => debug!("Rejected expired token"),
            other => debug!(error = %other, "Rejected token"),
        }
        AuthError::InvalidToken
    })?;

    Ok(claims.sub)
}

/// Authenticates the request or short-circuits with 401
pub async fn jwt_auth_middleware(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user_id = resolve_subject(req.headers(), &codec)?;

    req.extensions_mut().insert(AuthContext { user_id });

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    const SECRET: &str = "test-secret-key-that-is-long-enough";

    fn codec() -> TokenCodec {
        TokenCodec::hs256(SECRET, Duration::minutes(30))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_resolve_valid_bearer() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let token = codec.issue(user_id).unwrap();

        let subject = resolve_subject(&headers_with(&format!("Bearer {}", token)), &codec).unwrap();
        assert_eq!(subject, user_id);

        // Scheme is case-insensitive
        let subject = resolve_subject(&headers_with(&format!("bearer {}", token)), &codec).unwrap();
        assert_eq!(subject, user_id);
    }

    #[test]
    fn test_resolve_missing_header() {
        assert!(matches!(
            resolve_subject(&HeaderMap::new(), &codec()),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_resolve_wrong_scheme() {
        let codec = codec();
        let token = codec.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(
            resolve_subject(&headers_with(&format!("Basic {}", token)), &codec),
            Err(AuthError::InvalidFormat)
        ));
        assert!(matches!(
            resolve_subject(&headers_with(&token), &codec),
            Err(AuthError::InvalidFormat)
        ));
        assert!(matches!(
            resolve_subject(&headers_with("Bearer "), &codec),
            Err(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_resolve_bad_tokens() {
        let codec = codec();

        assert!(matches!(
            resolve_subject(&headers_with("Bearer not.a.token"), &codec),
            Err(AuthError::InvalidToken)
        ));

        let other = TokenCodec::hs256("another-secret-key-that-is-long-enough", Duration::minutes(30));
        let foreign = other.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            resolve_subject(&headers_with(&format!("Bearer {}", foreign)), &codec),
            Err(AuthError::InvalidToken)
        ));

        let expired = codec
            .issue_at(Uuid::new_v4(), Utc::now() - Duration::hours(2), Duration::minutes(30))
            .unwrap();
        assert!(matches!(
            resolve_subject(&headers_with(&format!("Bearer {}", expired)), &codec),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat,
            AuthError::InvalidToken,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }

    #[tokio::test]
    async fn test_extractor_reads_extension() {
        let user_id = Uuid::new_v4();
        let (mut parts, _) = axum::http::Request::new(()).into_parts();

        assert!(AuthContext::from_request_parts(&mut parts, &()).await.is_err());

        parts.extensions.insert(AuthContext { user_id });
        let auth = AuthContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.user_id, user_id);
    }
}
