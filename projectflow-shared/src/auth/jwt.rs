/// JWT token issuance and validation
///
/// Access tokens are signed with a symmetric HMAC algorithm (HS256 by default)
/// using a process-wide secret. The secret is read once at startup and held by
/// a [`TokenCodec`]; rotating it invalidates every outstanding token, which is
/// the only revocation mechanism there is.
///
/// # Expiry
///
/// A token issued at `iat` with time-to-live `ttl` is accepted strictly before
/// `iat + ttl` and rejected at or after that instant. Issue time is truncated
/// to whole seconds so the boundary is exact. The library's own expiry check
/// (which tolerates `now == exp` plus leeway) is disabled in favour of this
/// rule.
///
/// # Example
///
/// ```
/// use projectflow_shared::auth::jwt::TokenCodec;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let codec = TokenCodec::hs256("your-secret-key-at-least-32-bytes", Duration::minutes(30));
/// let user_id = Uuid::new_v4();
///
/// let token = codec.issue(user_id)?;
/// let claims = codec.decode(&token)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Issuer claim stamped on, and required from, every token
pub const ISSUER: &str = "projectflow";

/// Default access token lifetime in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Malformed token, bad signature, wrong algorithm or wrong issuer
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Algorithm name is unknown or not a shared-secret algorithm
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// JWT claims structure
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always [`ISSUER`])
/// - `iat`: Issued at (Unix seconds)
/// - `exp`: Expiration (Unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `subject` issued at `issued_at`, valid for `ttl`
    pub fn new(subject: Uuid, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = issued_at.timestamp();

        Self {
            sub: subject,
            iss: ISSUER.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
        }
    }

    /// Checks whether the token is expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Issue time as a timestamp
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    /// Expiry instant as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Parses a signing algorithm name, accepting only HMAC algorithms
///
/// # Errors
///
/// Returns `JwtError::UnsupportedAlgorithm` for unknown names and for
/// asymmetric algorithms, which cannot work with a shared secret.
///
/// # Example
///
/// ```
/// use projectflow_shared::auth::jwt::parse_algorithm;
/// use jsonwebtoken::Algorithm;
///
/// assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
/// assert!(parse_algorithm("RS256").is_err());
/// ```
pub fn parse_algorithm(name: &str) -> Result<Algorithm, JwtError> {
    let algorithm = Algorithm::from_str(name)
        .map_err(|_| JwtError::UnsupportedAlgorithm(name.to_string()))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => Err(JwtError::UnsupportedAlgorithm(name.to_string())),
    }
}

/// Signs and verifies access tokens with one secret and algorithm
///
/// Built once at startup and shared (behind an `Arc`) by the login handler
/// and the access guard.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Creates a codec for an HMAC algorithm
    ///
    /// # Errors
    ///
    /// Returns `JwtError::UnsupportedAlgorithm` if `algorithm` is not HS256,
    /// HS384 or HS512.
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Result<Self, JwtError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(JwtError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Creates an HS256 codec
    pub fn hs256(secret: &str, ttl: Duration) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Signing algorithm in use
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Default token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `subject` with the default lifetime
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if signing fails
    pub fn issue(&self, subject: Uuid) -> Result<String, JwtError> {
        self.issue_at(subject, Utc::now(), self.ttl)
    }

    /// Issues a token for `subject` with a custom lifetime
    pub fn issue_with_ttl(&self, subject: Uuid, ttl: Duration) -> Result<String, JwtError> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    /// Issues a token as if the current time were `issued_at`
    pub fn issue_at(
        &self,
        subject: Uuid,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject, issued_at, ttl);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token against the current time
    ///
    /// # Errors
    ///
    /// - `JwtError::Expired` once `now >= exp`
    /// - `JwtError::Invalid` for malformed tokens, bad signatures, a different
    ///   algorithm or a foreign issuer
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now())
    }

    /// Validates a token as if the current time were `now`
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::Invalid(e.to_string()))?
            .claims;

        if claims.is_expired_at(now) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn codec() -> TokenCodec {
        TokenCodec::hs256(SECRET, Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, at(1_700_000_000), Duration::minutes(30));

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + 1800);
        assert_eq!(claims.expires_at(), Some(at(1_700_001_800)));
    }

    #[test]
    fn test_issue_and_decode_round_trip() {
        let codec = codec();
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id).expect("Should create token");
        let claims = codec.decode(&token).expect("Should validate token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let codec = codec();
        let issued = at(1_700_000_000);
        let token = codec
            .issue_at(Uuid::new_v4(), issued, Duration::seconds(60))
            .unwrap();

        assert!(codec.decode_at(&token, issued).is_ok());
        assert!(codec.decode_at(&token, at(1_700_000_059)).is_ok());
        assert!(matches!(
            codec.decode_at(&token, at(1_700_000_060)),
            Err(JwtError::Expired)
        ));
        assert!(matches!(
            codec.decode_at(&token, at(1_700_000_061)),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_subsecond_before_expiry_is_accepted() {
        let codec = codec();
        let issued = at(1_700_000_000);
        let token = codec
            .issue_at(Uuid::new_v4(), issued, Duration::seconds(10))
            .unwrap();

        let just_before = issued + Duration::milliseconds(9_999);
        assert!(codec.decode_at(&token, just_before).is_ok());
    }

    #[test]
    fn test_expired_token_rejected_now() {
        let codec = codec();
        let token = codec
            .issue_with_ttl(Uuid::new_v4(), Duration::seconds(-3600))
            .unwrap();

        assert!(matches!(codec.decode(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let token = codec().issue(Uuid::new_v4()).unwrap();
        let other = TokenCodec::hs256("another-secret-key-at-least-32-bytes", Duration::minutes(30));

        assert!(matches!(other.decode(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_decode_malformed_token() {
        let codec = codec();

        assert!(matches!(codec.decode("not-a-jwt"), Err(JwtError::Invalid(_))));
        assert!(matches!(codec.decode(""), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_decode_rejects_other_algorithm() {
        let hs512 = TokenCodec::new(SECRET, Algorithm::HS512, Duration::minutes(30)).unwrap();
        let token = hs512.issue(Uuid::new_v4()).unwrap();

        assert!(hs512.decode(&token).is_ok());
        assert!(codec().decode(&token).is_err());
    }

    #[test]
    fn test_decode_rejects_foreign_issuer() {
        #[derive(Serialize)]
        struct Foreign {
            sub: Uuid,
            iss: &'static str,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let claims = Foreign {
            sub: Uuid::new_v4(),
            iss: "someone-else",
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(codec().decode(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("HS384").unwrap(), Algorithm::HS384);
        assert!(matches!(
            parse_algorithm("RS256"),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
        assert!(parse_algorithm("hs256").is_err());
        assert!(parse_algorithm("none").is_err());
    }

    #[test]
    fn test_new_rejects_asymmetric_algorithm() {
        let result = TokenCodec::new(SECRET, Algorithm::RS256, Duration::minutes(30));
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(_))));
    }
}
