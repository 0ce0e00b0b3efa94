/// Email + password login
///
/// An unknown email and a wrong password produce the same
/// [`ServiceError::InvalidCredentials`]. When the email is unknown the
/// password is still verified, against [`DUMMY_HASH`] on the blocking pool,
/// so both failures take about as long.

use sqlx::PgPool;
use tracing::{debug, warn};

use super::password::{verify_password_async, DUMMY_HASH};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::User;

/// Checks `password` against the account found for an email (if any)
///
/// # Errors
///
/// - `InvalidCredentials` when there is no account or the password is wrong
/// - `Password` when the stored hash cannot be processed
pub async fn check_credentials(user: Option<User>, password: &str) -> ServiceResult<User> {
    let Some(user) = user else {
        // Result ignored; only the elapsed time matters
        let _ = verify_password_async(password.to_string(), DUMMY_HASH.to_string()).await;
        return Err(ServiceError::InvalidCredentials);
    };

    let matches = verify_password_async(password.to_string(), user.password_hash.clone()).await?;

    if !matches {
        return Err(ServiceError::InvalidCredentials);
    }

    Ok(user)
}

/// Looks up a user by exact email and verifies the password
///
/// Read-only. The returned record still holds the password hash; callers
/// must not serialize it.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> ServiceResult<User> {
    let user = User::find_by_email(pool, email).await?;

    match check_credentials(user, password).await {
        Ok(user) => {
            debug!(user_id = %user.id, "Credentials accepted");
            Ok(user)
        }
        Err(ServiceError::InvalidCredentials) => {
            warn!("Login rejected");
            Err(ServiceError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{hash_password_with, PasswordParams};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    fn user_with_password(password: &str) -> User {
        let params = PasswordParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        };
        let now = Utc::now();

        User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: hash_password_with(password, params).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_correct_password_returns_user() {
        let user = user_with_password("secret1");
        let id = user.id;

        let found = check_credentials(Some(user), "secret1").await.unwrap();
        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_identical() {
        let wrong = check_credentials(Some(user_with_password("secret1")), "secret2")
            .await
            .unwrap_err();
        let unknown = check_credentials(None, "secret1").await.unwrap_err();

        assert!(matches!(wrong, ServiceError::InvalidCredentials));
        assert!(matches!(unknown, ServiceError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_plaintext_stored_credential_is_an_error() {
        let mut user = user_with_password("secret1");
        user.password_hash = "secret1".to_string();

        let err = check_credentials(Some(user), "secret1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Password(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_unknown_user_does_not_block_the_runtime() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = ticks.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        let err = check_credentials(None, "secret1").await.unwrap_err();
        let seen = ticks.load(Ordering::SeqCst);
        ticker.abort();

        assert!(matches!(err, ServiceError::InvalidCredentials));
        // The single runtime thread kept running other tasks while the
        // default-cost verification ran elsewhere
        assert!(seen > 0, "runtime was blocked during the unknown-user check");
    }
}
