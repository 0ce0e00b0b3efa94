/// Per-resource ownership check
///
/// Only user accounts carry an ownership rule: a subject may update or delete
/// its own account and nobody else's. Projects, cycles, phases, artifacts
/// and cards are open to any authenticated subject.
///
/// # Example
///
/// ```
/// use projectflow_shared::auth::authorization::{assert_owns, AuthzError};
/// use uuid::Uuid;
///
/// let me = Uuid::new_v4();
/// assert!(assert_owns(me, me).is_ok());
/// assert!(matches!(assert_owns(me, Uuid::new_v4()), Err(AuthzError::NotAuthorized)));
/// ```

use uuid::Uuid;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Authenticated, but the target belongs to someone else
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Fails unless `subject` and `target` are the same user
pub fn assert_owns(subject: Uuid, target: Uuid) -> Result<(), AuthzError> {
    if subject != target {
        return Err(AuthzError::NotAuthorized);
    }

    Ok(())
}
