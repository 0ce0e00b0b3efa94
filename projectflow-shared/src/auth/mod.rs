/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: signed, time-limited access tokens
/// - [`authenticator`]: email + password login
/// - [`middleware`]: bearer-token guard and the [`middleware::AuthContext`] extractor
/// - [`authorization`]: the user-account ownership rule
///
/// # Example
///
/// ```no_run
/// use projectflow_shared::auth::password::{hash_password, verify_password};
/// use projectflow_shared::auth::jwt::TokenCodec;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let codec = TokenCodec::hs256("your-secret-key-at-least-32-bytes", Duration::minutes(30));
/// let token = codec.issue(Uuid::new_v4())?;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod jwt;
pub mod authenticator;
pub mod middleware;
pub mod authorization;
