/// User account rules
///
/// Email is the natural key. Passwords are hashed off the async runtime
/// before any connection is taken from the pool.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::hash_password_async;
use crate::error::{ServiceError, ServiceResult};
use crate::models::project_member::ProjectMember;
use crate::models::user::{CreateUser, UpdateUser, User};

/// Registration input with the plaintext password
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Profile update input; `password` is re-hashed when present
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
}

fn duplicate_email() -> ServiceError {
    ServiceError::DuplicateKey("Email already registered".to_string())
}

/// Creates a user account
///
/// # Errors
///
/// - `DuplicateKey` if the email is already registered
pub async fn register(pool: &PgPool, input: Registration) -> ServiceResult<User> {
    let password_hash = hash_password_async(input.password).await?;

    let mut tx = pool.begin().await?;

    if User::email_taken(&mut *tx, &input.email, None).await? {
        return Err(duplicate_email());
    }

    let user = User::create(
        &mut *tx,
        CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
        },
    )
    .await?;

    tx.commit().await?;

    info!(user_id = %user.id, "User registered");
    Ok(user)
}

/// Fetches one user
pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<User> {
    User::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User"))
}

/// Lists every user, newest first
pub async fn list(pool: &PgPool) -> ServiceResult<Vec<User>> {
    Ok(User::list(pool).await?)
}

/// Updates name, email and optionally the password of a user
///
/// # Errors
///
/// - `NotFound` if the user does not exist
/// - `DuplicateKey` if another user already has the new email
pub async fn update(pool: &PgPool, id: Uuid, input: ProfileUpdate) -> ServiceResult<User> {
    let password_hash = match input.password {
        Some(password) => Some(hash_password_async(password).await?),
        None => None,
    };

    let mut tx = pool.begin().await?;

    if User::find_by_id(&mut *tx, id).await?.is_none() {
        return Err(ServiceError::not_found("User"));
    }

    if User::email_taken(&mut *tx, &input.email, Some(id)).await? {
        return Err(duplicate_email());
    }

    let user = User::update(
        &mut *tx,
        id,
        UpdateUser {
            name: input.name,
            email: input.email,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ServiceError::not_found("User"))?;

    tx.commit().await?;

    info!(user_id = %id, "User updated");
    Ok(user)
}

/// Deletes a user together with their project links
///
/// # Errors
///
/// - `NotFound` if the user does not exist
/// - `Validation` if cards are still assigned to the user
pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let links = ProjectMember::delete_for_user(&mut *tx, id).await?;

    if !User::delete(&mut *tx, id)
        .await
        .map_err(ServiceError::from_delete)?
    {
        return Err(ServiceError::not_found("User"));
    }

    tx.commit().await?;

    info!(user_id = %id, removed_links = links, "User deleted");
    Ok(())
}
