//! services/api/src/web/contacts.rs
//!
//! Handlers for importing the device contact list, reading it back, and the
//! grouped attention view.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use family_loop_core::{
    filter_contacts,
    messages::{MessageRequest, Tone},
    ranker::{days_between, GroupedView},
    Contact, InteractionLog, RawContact,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{port_failure, HttpError};
use crate::web::state::AppState;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The device address book, as read by the client.
#[derive(Deserialize, ToSchema)]
pub struct ImportContactsRequest {
    #[schema(value_type = Vec<Object>)]
    pub contacts: Vec<RawContact>,
}

/// How many contacts arrived and how many survived filtering.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportContactsResponse {
    pub total: usize,
    pub kept: usize,
}

#[derive(Serialize, ToSchema)]
pub struct ContactsResponse {
    #[schema(value_type = Vec<Object>)]
    pub contacts: Vec<Contact>,
}

/// Contacts grouped by relationship bucket, most in need of attention first.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactViewResponse {
    pub generated_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub groups: GroupedView,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionQuery {
    /// warm, casual, playful or neutral. Anything else is neutral.
    pub tone: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SuggestionResponse {
    pub message: String,
    pub tone: String,
}

/// Keeps the first entry for each device id. Stored contacts are keyed by id.
fn first_per_id(raw: Vec<RawContact>) -> Vec<RawContact> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|contact| seen.insert(contact.id.clone()))
        .collect()
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Replace the tracked contacts with a freshly imported address book.
///
/// Contacts are classified, filtered and capped before being stored. The
/// interaction log is left untouched.
#[utoipa::path(
    post,
    path = "/contacts/import",
    request_body = ImportContactsRequest,
    responses(
        (status = 200, description = "Contacts imported", body = ImportContactsResponse),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn import_contacts_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<ImportContactsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let total = payload.contacts.len();
    let unique = first_per_id(payload.contacts);
    let kept = filter_contacts(&unique, &app_state.config.filter_policy());
    let response = ImportContactsResponse {
        total,
        kept: kept.len(),
    };

    app_state
        .db
        .replace_contacts(user_id, kept)
        .await
        .map_err(|e| port_failure("store contacts", e))?;

    info!(%user_id, total, kept = response.kept, "Imported contacts");
    Ok(Json(response))
}

/// List the stored, classified contacts in import order.
#[utoipa::path(
    get,
    path = "/contacts",
    responses(
        (status = 200, description = "Stored contacts", body = ContactsResponse),
        (status = 401, description = "Missing or invalid x-user-id header")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn list_contacts_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contacts = app_state
        .db
        .list_contacts(user_id)
        .await
        .map_err(|e| port_failure("load contacts", e))?;
    Ok(Json(ContactsResponse { contacts }))
}

/// The attention view: contacts grouped and ranked against the interaction log.
#[utoipa::path(
    get,
    path = "/contacts/view",
    responses(
        (status = 200, description = "Grouped, ranked contacts", body = ContactViewResponse),
        (status = 401, description = "Missing or invalid x-user-id header")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn contact_view_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let db = &app_state.db;
    let contacts = db
        .list_contacts(user_id)
        .await
        .map_err(|e| port_failure("load contacts", e))?;
    let log = InteractionLog::from(
        db.list_interactions(user_id)
            .await
            .map_err(|e| port_failure("load interactions", e))?,
    );

    let now = Utc::now();
    Ok(Json(ContactViewResponse {
        generated_at: now,
        groups: log.rank(&contacts, now),
    }))
}

/// Draft a message the user could send to reconnect with a contact.
#[utoipa::path(
    get,
    path = "/contacts/{id}/suggestion",
    responses(
        (status = 200, description = "Suggested message", body = SuggestionResponse),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 404, description = "Contact not found")
    ),
    params(
        ("id" = String, Path, description = "The device contact id."),
        SuggestionQuery,
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn suggestion_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(contact_id): Path<String>,
    Query(query): Query<SuggestionQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let db = &app_state.db;
    let contact = db
        .get_contact(user_id, &contact_id)
        .await
        .map_err(|e| port_failure("load contact", e))?;
    let log = InteractionLog::from(
        db.list_interactions(user_id)
            .await
            .map_err(|e| port_failure("load interactions", e))?,
    );

    let tone = query.tone.as_deref().map(Tone::from_label).unwrap_or_default();
    let name = match contact.display_name() {
        "" => "there".to_string(),
        name => name.to_string(),
    };
    let request = MessageRequest {
        name,
        relationship: contact.relationship,
        tone,
        days_since_contact: log
            .latest_for(&contact.id)
            .map(|last| days_between(last.occurred_at, Utc::now())),
    };

    let message = app_state
        .suggestions
        .suggest(&request)
        .await
        .map_err(|e| port_failure("suggest a message", e))?;
    Ok(Json(SuggestionResponse {
        message,
        tone: tone.as_str().to_string(),
    }))
}
