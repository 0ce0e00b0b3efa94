/// Password hashing with Argon2id
///
/// Stored credentials are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
/// so the cost parameters travel with each hash and can be raised later
/// without invalidating existing accounts.
///
/// # Example
///
/// ```
/// use projectflow_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("secret1")?;
///
/// assert!(verify_password("secret1", &hash)?);
/// assert!(!verify_password("secret2", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordParams {
    /// 64 MiB, 3 passes, 4 lanes
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Hashes a password with the default parameters and a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with(password, PasswordParams::default())
}

/// Hashes a password with explicit cost parameters
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are out of range or
/// hashing fails
pub fn hash_password_with(password: &str, params: PasswordParams) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon_params = ParamsBuilder::new()
        .m_cost(params.memory_kib)
        .t_cost(params.iterations)
        .p_cost(params.parallelism)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon_params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))
}

/// Verifies a password against a stored PHC hash
///
/// The comparison is constant-time. Parameters are read from the hash itself.
///
/// # Returns
///
/// `Ok(true)` on a match, `Ok(false)` on a mismatch
///
/// # Errors
///
/// - `PasswordError::InvalidHash` if `hash` cannot be parsed or lacks a
///   salt or output
/// - `PasswordError::VerifyError` for any other verification failure
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash(
            "Hash has no salt or output".to_string(),
        ));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Runs [`hash_password`] on the blocking thread pool
///
/// Argon2 with the default parameters takes tens of milliseconds of CPU and
/// 64 MiB of memory; it must not run on an async worker thread.
pub async fn hash_password_async(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
}

/// Runs [`verify_password`] on the blocking thread pool
pub async fn verify_password_async(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::VerifyError(format!("Verification task failed: {}", e)))?
}

/// Well-formed hash at the default cost that no password matches
///
/// Login verifies against it when an email is unknown, so that path costs
/// one blocking-pool verification like a wrong password does.
pub const DUMMY_HASH: &str = "$argon2id$v=19$m=65536,t=3,p=4$cHJvamVjdGZsb3ctZHVtbXk$A8IWSIrivKMXAmhlPZjeGXoeBQr13WVP3Q9ZYpLGbfA";

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordParams {
        PasswordParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_password_uses_default_params() {
        let hash = hash_password("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536,t=3,p=4"));
    }

    #[test]
    fn test_hash_password_with_custom_params() {
        let hash = hash_password_with("secret1", fast()).unwrap();
        assert!(hash.contains("m=8,t=1,p=1"));
        assert!(verify_password("secret1", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let hash1 = hash_password_with("same_password", fast()).unwrap();
        let hash2 = hash_password_with("same_password", fast()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_mismatch() {
        let hash = hash_password_with("secret1", fast()).unwrap();

        assert!(!verify_password("secret2", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(matches!(
            verify_password("password", "plaintext-password"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(matches!(
            verify_password("password", "$argon2id$invalid"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_unicode_password() {
        let hash = hash_password_with("senha-ção-密码", fast()).unwrap();
        assert!(verify_password("senha-ção-密码", &hash).unwrap());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = PasswordParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        };
        assert!(matches!(
            hash_password_with("x", params),
            Err(PasswordError::HashError(_))
        ));
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hash = hash_password_async("secret1".to_string()).await.unwrap();

        assert!(verify_password_async("secret1".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password_async("secret2".to_string(), hash)
            .await
            .unwrap());
    }

    #[test]
    fn test_dummy_hash_uses_default_cost() {
        let parsed = PasswordHash::new(DUMMY_HASH).unwrap();
        let defaults = PasswordParams::default();

        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert_eq!(parsed.params.get_decimal("m"), Some(defaults.memory_kib));
        assert_eq!(parsed.params.get_decimal("t"), Some(defaults.iterations));
        assert_eq!(parsed.params.get_decimal("p"), Some(defaults.parallelism));
    }

    #[test]
    fn test_dummy_hash_matches_nothing() {
        assert!(!verify_password("projectflow-dummy-credential", DUMMY_HASH).unwrap());
        assert!(!verify_password("", DUMMY_HASH).unwrap());
    }
}
