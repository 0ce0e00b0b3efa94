/// Card model and database operations
///
/// Cards are the kanban items of a cycle: one unit of work in a phase,
/// producing an artifact, assigned to one user.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE card_status AS ENUM ('a_fazer', 'em_andamento', 'validacao', 'concluido');
///
/// CREATE TABLE cards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     status card_status NOT NULL DEFAULT 'a_fazer',
///     planned_hours DOUBLE PRECISION NOT NULL CHECK (planned_hours >= 0),
///     link TEXT NOT NULL DEFAULT '',
///     description TEXT NOT NULL DEFAULT '',
///     cycle_id UUID NOT NULL REFERENCES cycles(id),
///     phase_id UUID NOT NULL,
///     artifact_id UUID NOT NULL REFERENCES artifacts(id),
///     responsible_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `phase_id` has no foreign key: deleting a phase leaves its cards in place.
///
/// # Status
///
/// Any status may follow any other; there is no transition table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

const CARD_COLUMNS: &str = "id, status, planned_hours, link, description, cycle_id, phase_id, \
                            artifact_id, responsible_id, created_at, updated_at";

/// Kanban column of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "card_status")]
pub enum CardStatus {
    /// Not started
    #[serde(rename = "a_fazer")]
    #[sqlx(rename = "a_fazer")]
    Todo,

    /// Being worked on
    #[serde(rename = "em_andamento")]
    #[sqlx(rename = "em_andamento")]
    InProgress,

    /// Under review or testing
    #[serde(rename = "validacao")]
    #[sqlx(rename = "validacao")]
    Validation,

    /// Finished
    #[serde(rename = "concluido")]
    #[sqlx(rename = "concluido")]
    Done,
}

impl CardStatus {
    /// Wire and database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Todo => "a_fazer",
            CardStatus::InProgress => "em_andamento",
            CardStatus::Validation => "validacao",
            CardStatus::Done => "concluido",
        }
    }
}

/// A kanban card
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Card {
    pub id: Uuid,
    pub status: CardStatus,
    pub planned_hours: f64,
    pub link: String,
    pub description: String,
    pub cycle_id: Uuid,
    pub phase_id: Uuid,
    pub artifact_id: Uuid,
    pub responsible_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a card
#[derive(Debug, Clone)]
pub struct CreateCard {
    pub status: CardStatus,
    pub planned_hours: f64,
    pub link: String,
    pub description: String,
    pub cycle_id: Uuid,
    pub phase_id: Uuid,
    pub artifact_id: Uuid,
    pub responsible_id: Uuid,
}

/// Partial update of a card
///
/// Only `Some` fields are written. The owning cycle cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCard {
    pub status: Option<CardStatus>,
    pub planned_hours: Option<f64>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub phase_id: Option<Uuid>,
    pub artifact_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
}

impl UpdateCard {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }

    /// Columns that will be written, in bind order
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();

        if self.status.is_some() {
            columns.push("status");
        }
        if self.planned_hours.is_some() {
            columns.push("planned_hours");
        }
        if self.link.is_some() {
            columns.push("link");
        }
        if self.description.is_some() {
            columns.push("description");
        }
        if self.phase_id.is_some() {
            columns.push("phase_id");
        }
        if self.artifact_id.is_some() {
            columns.push("artifact_id");
        }
        if self.responsible_id.is_some() {
            columns.push("responsible_id");
        }

        columns
    }

    /// Builds the UPDATE statement; `$1` is the card ID
    ///
    /// `updated_at` is refreshed even when no other column is set.
    pub fn to_sql(&self) -> String {
        let mut query = String::from("UPDATE cards SET updated_at = NOW()");

        for (index, column) in self.columns().iter().enumerate() {
            query.push_str(&format!(", {} = ${}", column, index + 2));
        }

        query.push_str(" WHERE id = $1 RETURNING ");
        query.push_str(CARD_COLUMNS);
        query
    }
}

/// Optional filters for [`Card::list`], combined with AND
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub status: Option<CardStatus>,
    pub cycle_id: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
}

impl Card {
    /// Inserts a card
    ///
    /// Fails with a foreign-key violation if the cycle, artifact or
    /// responsible user does not exist.
    pub async fn create<'e, E>(executor: E, data: CreateCard) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            INSERT INTO cards (status, planned_hours, link, description,
                               cycle_id, phase_id, artifact_id, responsible_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CARD_COLUMNS
        );

        sqlx::query_as::<_, Card>(&query)
            .bind(data.status)
            .bind(data.planned_hours)
            .bind(data.link)
            .bind(data.description)
            .bind(data.cycle_id)
            .bind(data.phase_id)
            .bind(data.artifact_id)
            .bind(data.responsible_id)
            .fetch_one(executor)
            .await
    }

    /// Finds a card by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {} FROM cards WHERE id = $1", CARD_COLUMNS);

        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Applies a partial update
    ///
    /// # Returns
    ///
    /// The updated card, or None if no card has this ID
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateCard,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = data.to_sql();
        let mut q = sqlx::query_as::<_, Card>(&query).bind(id);

        // Same order as UpdateCard::columns
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(planned_hours) = data.planned_hours {
            q = q.bind(planned_hours);
        }
        if let Some(link) = data.link {
            q = q.bind(link);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(phase_id) = data.phase_id {
            q = q.bind(phase_id);
        }
        if let Some(artifact_id) = data.artifact_id {
            q = q.bind(artifact_id);
        }
        if let Some(responsible_id) = data.responsible_id {
            q = q.bind(responsible_id);
        }

        q.fetch_optional(executor).await
    }

    /// Deletes a card
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists cards matching `filter`, newest first
    pub async fn list<'e, E>(executor: E, filter: &CardFilter) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            SELECT {}
            FROM cards
            WHERE ($1::card_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR cycle_id = $2)
              AND ($3::uuid IS NULL OR responsible_id = $3)
            ORDER BY created_at DESC
            "#,
            CARD_COLUMNS
        );

        sqlx::query_as::<_, Card>(&query)
            .bind(filter.status)
            .bind(filter.cycle_id)
            .bind(filter.responsible_id)
            .fetch_all(executor)
            .await
    }
}
