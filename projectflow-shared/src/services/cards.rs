/// Kanban cards
///
/// Cycle, artifact and responsible user are guarded by foreign keys. The
/// phase is not, so its existence is checked here before every write that
/// sets it.
///
/// # Partial update
///
/// [`update`] writes only the fields present in [`UpdateCard`]; `updated_at`
/// is refreshed on every accepted update, including one with no fields.

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::card::{Card, CardFilter, CreateCard, UpdateCard};
use crate::models::phase::Phase;

/// Rejects negative, NaN and infinite hour estimates
pub fn check_planned_hours(hours: f64) -> ServiceResult<()> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(())
    } else {
        Err(ServiceError::Validation(
            "Planned hours must be zero or greater".to_string(),
        ))
    }
}

async fn check_phase(conn: &mut PgConnection, phase_id: Uuid) -> ServiceResult<()> {
    if Phase::exists(conn, phase_id).await? {
        Ok(())
    } else {
        Err(ServiceError::Validation(
            "Referenced record does not exist".to_string(),
        ))
    }
}

/// Creates a card
///
/// # Errors
///
/// - `Validation` if the hours are negative or any referenced record is
///   missing
pub async fn create(pool: &PgPool, data: CreateCard) -> ServiceResult<Card> {
    check_planned_hours(data.planned_hours)?;

    let mut tx = pool.begin().await?;

    check_phase(&mut tx, data.phase_id).await?;
    let card = Card::create(&mut *tx, data).await?;

    tx.commit().await?;

    info!(card_id = %card.id, cycle_id = %card.cycle_id, "Card created");
    Ok(card)
}

pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<Card> {
    Card::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Card"))
}

pub async fn list(pool: &PgPool, filter: &CardFilter) -> ServiceResult<Vec<Card>> {
    Ok(Card::list(pool, filter).await?)
}

/// Applies a partial update to a card
///
/// # Errors
///
/// - `NotFound` if the card does not exist
/// - `Validation` if new hours are negative or a new reference is missing
pub async fn update(pool: &PgPool, id: Uuid, changes: UpdateCard) -> ServiceResult<Card> {
    if let Some(hours) = changes.planned_hours {
        check_planned_hours(hours)?;
    }

    let mut tx = pool.begin().await?;

    if Card::find_by_id(&mut *tx, id).await?.is_none() {
        return Err(ServiceError::not_found("Card"));
    }

    if let Some(phase_id) = changes.phase_id {
        check_phase(&mut tx, phase_id).await?;
    }

    let fields = changes.columns().len();
    let card = Card::update(&mut *tx, id, changes)
        .await?
        .ok_or_else(|| ServiceError::not_found("Card"))?;

    tx.commit().await?;

    info!(card_id = %id, fields, status = card.status.as_str(), "Card updated");
    Ok(card)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    if !Card::delete(pool, id).await? {
        return Err(ServiceError::not_found("Card"));
    }

    info!(card_id = %id, "Card deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planned_hours_bounds() {
        assert!(check_planned_hours(0.0).is_ok());
        assert!(check_planned_hours(12.5).is_ok());

        assert!(matches!(
            check_planned_hours(-0.5),
            Err(ServiceError::Validation(_))
        ));
        assert!(check_planned_hours(f64::NAN).is_err());
        assert!(check_planned_hours(f64::INFINITY).is_err());
    }
}
