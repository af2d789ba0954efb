//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use family_loop_core::domain::{
    CommunicationGoal, Contact, FamilyEvent, Interaction, Relationship, User,
};
use family_loop_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use std::fmt::Display;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: impl Display) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
        }
    }
}

#[derive(FromRow)]
struct ContactRecord {
    id: String,
    name: Option<String>,
    phone_numbers: Vec<String>,
    relationship: String,
}
impl ContactRecord {
    fn to_domain(self) -> PortResult<Contact> {
        let relationship: Relationship = self.relationship.parse().map_err(unexpected)?;
        Ok(Contact {
            id: self.id,
            name: self.name,
            phone_numbers: self.phone_numbers,
            relationship,
            group: relationship.group(),
        })
    }
}

#[derive(FromRow)]
struct InteractionRecord {
    id: Uuid,
    contact_id: String,
    kind: String,
    occurred_at: DateTime<Utc>,
    note: Option<String>,
}
impl InteractionRecord {
    fn to_domain(self) -> PortResult<Interaction> {
        Ok(Interaction {
            id: self.id,
            contact_id: self.contact_id,
            kind: self.kind.parse().map_err(unexpected)?,
            occurred_at: self.occurred_at,
            note: self.note,
        })
    }
}

#[derive(FromRow)]
struct GoalRecord {
    id: Uuid,
    contact_id: String,
    contact_name: String,
    frequency: String,
    method: String,
    is_active: bool,
    custom_note: Option<String>,
    created_at: DateTime<Utc>,
}
impl GoalRecord {
    fn to_domain(self) -> PortResult<CommunicationGoal> {
        Ok(CommunicationGoal {
            id: self.id,
            contact_id: self.contact_id,
            contact_name: self.contact_name,
            frequency: self.frequency.parse().map_err(unexpected)?,
            method: self.method.parse().map_err(unexpected)?,
            is_active: self.is_active,
            custom_note: self.custom_note,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct EventRecord {
    id: Uuid,
    contact_id: String,
    contact_name: String,
    kind: String,
    title: String,
    date: NaiveDate,
    is_recurring: bool,
    reminder_days: Vec<i32>,
    notes: Option<String>,
    last_wished: Option<DateTime<Utc>>,
    is_active: bool,
}
impl EventRecord {
    fn to_domain(self) -> PortResult<FamilyEvent> {
        let reminder_days = self
            .reminder_days
            .into_iter()
            .map(u32::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(unexpected)?;
        Ok(FamilyEvent {
            id: self.id,
            contact_id: self.contact_id,
            contact_name: self.contact_name,
            kind: self.kind.parse().map_err(unexpected)?,
            title: self.title,
            date: self.date,
            is_recurring: self.is_recurring,
            reminder_days,
            notes: self.notes,
            last_wished: self.last_wished,
            is_active: self.is_active,
        })
    }
}

const GOAL_COLUMNS: &str =
    "id, contact_id, contact_name, frequency, method, is_active, custom_note, created_at";

const EVENT_COLUMNS: &str = "id, contact_id, contact_name, kind, title, date, is_recurring, \
     reminder_days, notes, last_wished, is_active";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn get_or_create_user(&self, user_id: Uuid) -> PortResult<User> {
        sqlx::query("INSERT INTO users (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        let record = sqlx::query_as::<_, UserRecord>("SELECT user_id FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn replace_contacts(&self, user_id: Uuid, contacts: Vec<Contact>) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query("DELETE FROM contacts WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        for (position, contact) in contacts.iter().enumerate() {
            sqlx::query(
                "INSERT INTO contacts (user_id, id, name, phone_numbers, relationship, position) \
                 VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (user_id, id) DO NOTHING",
            )
            .bind(user_id)
            .bind(&contact.id)
            .bind(&contact.name)
            .bind(&contact.phone_numbers)
            .bind(contact.relationship.as_str())
            .bind(i32::try_from(position).map_err(unexpected)?)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn list_contacts(&self, user_id: Uuid) -> PortResult<Vec<Contact>> {
        let records = sqlx::query_as::<_, ContactRecord>(
            "SELECT id, name, phone_numbers, relationship FROM contacts \
             WHERE user_id = $1 ORDER BY position ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(ContactRecord::to_domain).collect()
    }

    async fn get_contact(&self, user_id: Uuid, contact_id: &str) -> PortResult<Contact> {
        let record = sqlx::query_as::<_, ContactRecord>(
            "SELECT id, name, phone_numbers, relationship FROM contacts \
             WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Contact {} not found", contact_id)))?;

        record.to_domain()
    }

    async fn append_interaction(&self, user_id: Uuid, interaction: Interaction) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO interactions (id, user_id, contact_id, kind, occurred_at, note) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(interaction.id)
        .bind(user_id)
        .bind(&interaction.contact_id)
        .bind(interaction.kind.as_str())
        .bind(interaction.occurred_at)
        .bind(&interaction.note)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn list_interactions(&self, user_id: Uuid) -> PortResult<Vec<Interaction>> {
        let records = sqlx::query_as::<_, InteractionRecord>(
            "SELECT id, contact_id, kind, occurred_at, note FROM interactions \
             WHERE user_id = $1 ORDER BY seq ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(InteractionRecord::to_domain).collect()
    }

    async fn create_goal(&self, user_id: Uuid, goal: CommunicationGoal) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO goals (id, user_id, contact_id, contact_name, frequency, method, \
             is_active, custom_note, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(goal.id)
        .bind(user_id)
        .bind(&goal.contact_id)
        .bind(&goal.contact_name)
        .bind(goal.frequency.as_str())
        .bind(goal.method.as_str())
        .bind(goal.is_active)
        .bind(&goal.custom_note)
        .bind(goal.created_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn list_goals(&self, user_id: Uuid) -> PortResult<Vec<CommunicationGoal>> {
        let records = sqlx::query_as::<_, GoalRecord>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(GoalRecord::to_domain).collect()
    }

    async fn toggle_goal(&self, user_id: Uuid, goal_id: Uuid) -> PortResult<CommunicationGoal> {
        let record = sqlx::query_as::<_, GoalRecord>(&format!(
            "UPDATE goals SET is_active = NOT is_active WHERE user_id = $1 AND id = $2 \
             RETURNING {GOAL_COLUMNS}"
        ))
        .bind(user_id)
        .bind(goal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Goal {} not found", goal_id)))?;

        record.to_domain()
    }

    async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM goals WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(goal_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Goal {} not found", goal_id)));
        }
        Ok(())
    }

    async fn create_event(&self, user_id: Uuid, event: FamilyEvent) -> PortResult<()> {
        let reminder_days = event
            .reminder_days
            .iter()
            .map(|&d| i32::try_from(d))
            .collect::<Result<Vec<_>, _>>()
            .map_err(unexpected)?;

        sqlx::query(
            "INSERT INTO events (id, user_id, contact_id, contact_name, kind, title, date, \
             is_recurring, reminder_days, notes, last_wished, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(event.id)
        .bind(user_id)
        .bind(&event.contact_id)
        .bind(&event.contact_name)
        .bind(event.kind.as_str())
        .bind(&event.title)
        .bind(event.date)
        .bind(event.is_recurring)
        .bind(reminder_days)
        .bind(&event.notes)
        .bind(event.last_wished)
        .bind(event.is_active)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn list_events(&self, user_id: Uuid) -> PortResult<Vec<FamilyEvent>> {
        let records = sqlx::query_as::<_, EventRecord>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(EventRecord::to_domain).collect()
    }

    async fn mark_event_wished(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        at: DateTime<Utc>,
    ) -> PortResult<FamilyEvent> {
        let record = sqlx::query_as::<_, EventRecord>(&format!(
            "UPDATE events SET last_wished = $3 WHERE user_id = $1 AND id = $2 \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(event_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Event {} not found", event_id)))?;

        record.to_domain()
    }

    async fn delete_event(&self, user_id: Uuid, event_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Event {} not found", event_id)));
        }
        Ok(())
    }
}
