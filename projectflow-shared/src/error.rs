/// Error taxonomy for the service layer
///
/// Services return [`ServiceError`] so the HTTP boundary can translate each
/// business-rule violation to exactly one status code. Raw `sqlx` errors are
/// classified on the way in: constraint violations become business errors,
/// anything else is an opaque storage failure.
///
/// # Example
///
/// ```
/// use projectflow_shared::error::ServiceError;
///
/// let err = ServiceError::DuplicateKey("Email already registered".to_string());
/// assert_eq!(err.to_string(), "Email already registered");
/// ```

use sqlx::error::ErrorKind;

use crate::auth::password::PasswordError;

/// Result alias used by every service function
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business-rule and storage errors raised by services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed input or a reference to a record that does not exist
    #[error("{0}")]
    Validation(String),

    /// Natural-key collision (email, project name, cycle name, artifact name)
    #[error("{0}")]
    DuplicateKey(String),

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The addressed record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Any lower-level failure (connection lost, pool timeout, bad SQL)
    #[error("Storage error: {0}")]
    Storage(sqlx::Error),

    /// Hashing or verifying a credential failed
    #[error("Credential processing failed: {0}")]
    Password(#[from] PasswordError),
}

/// Message for a write that points at a missing parent row
pub const MISSING_REFERENCE: &str = "Referenced record does not exist";

/// Message for a delete blocked by rows that still point at the target
pub const STILL_REFERENCED: &str = "Record is still referenced by other records";

impl ServiceError {
    /// Shorthand for a not-found error naming the entity
    pub fn not_found(entity: &str) -> Self {
        ServiceError::NotFound(format!("{} not found", entity))
    }

    /// Classifies an error raised by a `DELETE` of a parent row
    ///
    /// Postgres uses one SQLSTATE for both directions of a foreign-key
    /// violation, so the direction comes from the statement: a failed delete
    /// means other rows still reference the target.
    pub fn from_delete(err: sqlx::Error) -> Self {
        if is_foreign_key_violation(&err) {
            ServiceError::Validation(STILL_REFERENCED.to_string())
        } else {
            ServiceError::from(err)
        }
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.kind() == ErrorKind::ForeignKeyViolation)
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Database(db_err) => Some(db_err.kind()),
            _ => None,
        };

        match kind {
            Some(ErrorKind::UniqueViolation) => {
                ServiceError::DuplicateKey(duplicate_message(&err).to_string())
            }
            Some(ErrorKind::ForeignKeyViolation) => {
                ServiceError::Validation(MISSING_REFERENCE.to_string())
            }
            Some(ErrorKind::CheckViolation) => {
                ServiceError::Validation("Value out of range".to_string())
            }
            _ => ServiceError::Storage(err),
        }
    }
}

/// Maps a unique-constraint name to the message a client sees
fn duplicate_message(err: &sqlx::Error) -> &'static str {
    let constraint = match err {
        sqlx::Error::Database(db_err) => db_err.constraint().unwrap_or_default(),
        _ => "",
    };

    match constraint {
        "users_email_key" => "Email already registered",
        "projects_name_key" => "A project with this name already exists",
        "cycles_name_key" => "A cycle with this name already exists",
        "artifacts_name_key" => "An artifact with this name already exists",
        _ => "Duplicate record",
    }
}
