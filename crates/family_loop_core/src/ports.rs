//! crates/family_loop_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture: storage and
//! message drafting live behind them, while the classification and ranking
//! pipeline stays pure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{CommunicationGoal, Contact, FamilyEvent, Interaction, User};
use crate::messages::MessageRequest;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Per-user storage for contacts, the interaction log, goals and events.
///
/// Interactions are append-only: there is no update or delete for them.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn get_or_create_user(&self, user_id: Uuid) -> PortResult<User>;

    // --- Contacts ---
    /// Replaces the user's tracked contacts with a freshly filtered list.
    async fn replace_contacts(&self, user_id: Uuid, contacts: Vec<Contact>) -> PortResult<()>;

    async fn list_contacts(&self, user_id: Uuid) -> PortResult<Vec<Contact>>;

    async fn get_contact(&self, user_id: Uuid, contact_id: &str) -> PortResult<Contact>;

    // --- Interaction Log ---
    async fn append_interaction(&self, user_id: Uuid, interaction: Interaction) -> PortResult<()>;

    /// All interactions in the order they were logged.
    async fn list_interactions(&self, user_id: Uuid) -> PortResult<Vec<Interaction>>;

    // --- Communication Goals ---
    async fn create_goal(&self, user_id: Uuid, goal: CommunicationGoal) -> PortResult<()>;

    async fn list_goals(&self, user_id: Uuid) -> PortResult<Vec<CommunicationGoal>>;

    /// Flips `is_active` in a single step and returns the updated goal.
    async fn toggle_goal(&self, user_id: Uuid, goal_id: Uuid) -> PortResult<CommunicationGoal>;

    async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> PortResult<()>;

    // --- Family Events ---
    async fn create_event(&self, user_id: Uuid, event: FamilyEvent) -> PortResult<()>;

    async fn list_events(&self, user_id: Uuid) -> PortResult<Vec<FamilyEvent>>;

    async fn mark_event_wished(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        at: DateTime<Utc>,
    ) -> PortResult<FamilyEvent>;

    async fn delete_event(&self, user_id: Uuid, event_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait MessageSuggestionService: Send + Sync {
    /// Drafts a short message the user could send to reconnect with a contact.
    async fn suggest(&self, request: &MessageRequest) -> PortResult<String>;
}
