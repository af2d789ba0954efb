//! services/api/src/adapters/memory.rs
//!
//! A process-local implementation of the `DatabaseService` port. Used when no
//! `DATABASE_URL` is configured and by the router tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use family_loop_core::domain::{CommunicationGoal, Contact, FamilyEvent, Interaction, User};
use family_loop_core::goals::toggle;
use family_loop_core::ports::{DatabaseService, PortError, PortResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct UserData {
    contacts: Vec<Contact>,
    interactions: Vec<Interaction>,
    goals: Vec<CommunicationGoal>,
    events: Vec<FamilyEvent>,
}

/// Keeps every user's data behind a single async lock. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, UserData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn goal_not_found(goal_id: Uuid) -> PortError {
    PortError::NotFound(format!("Goal {} not found", goal_id))
}

fn event_not_found(event_id: Uuid) -> PortError {
    PortError::NotFound(format!("Event {} not found", event_id))
}

#[async_trait]
impl DatabaseService for InMemoryStore {
    async fn get_or_create_user(&self, user_id: Uuid) -> PortResult<User> {
        self.users.write().await.entry(user_id).or_default();
        Ok(User { user_id })
    }

    async fn replace_contacts(&self, user_id: Uuid, contacts: Vec<Contact>) -> PortResult<()> {
        // Same rule as the unique (user_id, id) key in Postgres: first entry wins.
        let mut unique: Vec<Contact> = Vec::with_capacity(contacts.len());
        for contact in contacts {
            if !unique.iter().any(|c| c.id == contact.id) {
                unique.push(contact);
            }
        }
        self.users.write().await.entry(user_id).or_default().contacts = unique;
        Ok(())
    }

    async fn list_contacts(&self, user_id: Uuid) -> PortResult<Vec<Contact>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .map(|data| data.contacts.clone())
            .unwrap_or_default())
    }

    async fn get_contact(&self, user_id: Uuid, contact_id: &str) -> PortResult<Contact> {
        let users = self.users.read().await;
        users
            .get(&user_id)
            .and_then(|data| data.contacts.iter().find(|c| c.id == contact_id))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Contact {} not found", contact_id)))
    }

    async fn append_interaction(&self, user_id: Uuid, interaction: Interaction) -> PortResult<()> {
        self.users
            .write()
            .await
            .entry(user_id)
            .or_default()
            .interactions
            .push(interaction);
        Ok(())
    }

    async fn list_interactions(&self, user_id: Uuid) -> PortResult<Vec<Interaction>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .map(|data| data.interactions.clone())
            .unwrap_or_default())
    }

    async fn create_goal(&self, user_id: Uuid, goal: CommunicationGoal) -> PortResult<()> {
        self.users.write().await.entry(user_id).or_default().goals.push(goal);
        Ok(())
    }

    async fn list_goals(&self, user_id: Uuid) -> PortResult<Vec<CommunicationGoal>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .map(|data| data.goals.clone())
            .unwrap_or_default())
    }

    async fn toggle_goal(&self, user_id: Uuid, goal_id: Uuid) -> PortResult<CommunicationGoal> {
        let mut users = self.users.write().await;
        let goal = users
            .get_mut(&user_id)
            .and_then(|data| data.goals.iter_mut().find(|g| g.id == goal_id))
            .ok_or_else(|| goal_not_found(goal_id))?;
        toggle(goal);
        Ok(goal.clone())
    }

    async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> PortResult<()> {
        let mut users = self.users.write().await;
        let goals = &mut users
            .get_mut(&user_id)
            .ok_or_else(|| goal_not_found(goal_id))?
            .goals;
        let before = goals.len();
        goals.retain(|g| g.id != goal_id);
        if goals.len() == before {
            return Err(goal_not_found(goal_id));
        }
        Ok(())
    }

    async fn create_event(&self, user_id: Uuid, event: FamilyEvent) -> PortResult<()> {
        self.users.write().await.entry(user_id).or_default().events.push(event);
        Ok(())
    }

    async fn list_events(&self, user_id: Uuid) -> PortResult<Vec<FamilyEvent>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .map(|data| data.events.clone())
            .unwrap_or_default())
    }

    async fn mark_event_wished(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        at: DateTime<Utc>,
    ) -> PortResult<FamilyEvent> {
        let mut users = self.users.write().await;
        let event = users
            .get_mut(&user_id)
            .and_then(|data| data.events.iter_mut().find(|e| e.id == event_id))
            .ok_or_else(|| event_not_found(event_id))?;
        event.mark_wished(at);
        Ok(event.clone())
    }

    async fn delete_event(&self, user_id: Uuid, event_id: Uuid) -> PortResult<()> {
        let mut users = self.users.write().await;
        let events = &mut users
            .get_mut(&user_id)
            .ok_or_else(|| event_not_found(event_id))?
            .events;
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(event_not_found(event_id));
        }
        Ok(())
    }
}
