//! services/api/src/web/events.rs
//!
//! Handlers for family events and their reminders.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use family_loop_core::{
    events::{parse_event_date, upcoming_events, UpcomingEvent},
    EventType, FamilyEvent,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{invalid_input, port_failure, HttpError};
use crate::web::state::AppState;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

fn default_recurring() -> bool {
    true
}

fn default_reminder() -> u32 {
    1
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub contact_id: String,
    /// birthday, anniversary, wedding, graduation or custom.
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional except for custom events; defaults to "{name}'s {Type}".
    pub title: Option<String>,
    /// MM/DD (this year) or MM/DD/YYYY.
    pub date: String,
    #[serde(default = "default_recurring")]
    pub is_recurring: bool,
    /// Days before the event to remind: 0, 1, 3, 7 or 14.
    #[serde(default = "default_reminder")]
    pub reminder_days: u32,
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EventResponse {
    #[schema(value_type = Object)]
    pub event: FamilyEvent,
}

#[derive(Serialize, ToSchema)]
pub struct UpcomingEventsResponse {
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<UpcomingEvent>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Add a birthday, anniversary or other dated event for a contact.
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 404, description = "Contact not found"),
        (status = 422, description = "Invalid date, type, title or reminder offset")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn create_event_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let kind: EventType = payload.kind.parse().map_err(invalid_input)?;
    let date = parse_event_date(&payload.date, Utc::now().date_naive()).map_err(invalid_input)?;

    let db = &app_state.db;
    let contact = db
        .get_contact(user_id, &payload.contact_id)
        .await
        .map_err(|e| port_failure("load contact", e))?;

    let event = FamilyEvent::new(
        &contact,
        kind,
        payload.title.as_deref(),
        date,
        payload.is_recurring,
        payload.reminder_days,
        payload.notes.as_deref(),
    )
    .map_err(invalid_input)?;
    db.create_event(user_id, event.clone())
        .await
        .map_err(|e| port_failure("create event", e))?;

    info!(%user_id, event_id = %event.id, kind = kind.as_str(), "Created event");
    Ok((StatusCode::CREATED, Json(EventResponse { event })))
}

/// Active events projected onto the calendar, soonest first.
#[utoipa::path(
    get,
    path = "/events/upcoming",
    responses(
        (status = 200, description = "Upcoming events", body = UpcomingEventsResponse),
        (status = 401, description = "Missing or invalid x-user-id header")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn upcoming_events_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let events = app_state
        .db
        .list_events(user_id)
        .await
        .map_err(|e| port_failure("load events", e))?;
    Ok(Json(UpcomingEventsResponse {
        events: upcoming_events(&events, Utc::now()),
    }))
}

/// Record that the user sent their wishes for an event.
#[utoipa::path(
    post,
    path = "/events/{id}/wished",
    responses(
        (status = 200, description = "Event marked as wished", body = EventResponse),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 404, description = "Event not found")
    ),
    params(
        ("id" = Uuid, Path, description = "The event id."),
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn mark_wished_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let event = app_state
        .db
        .mark_event_wished(user_id, event_id, Utc::now())
        .await
        .map_err(|e| port_failure("update event", e))?;
    Ok(Json(EventResponse { event }))
}

/// Remove an event.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 404, description = "Event not found")
    ),
    params(
        ("id" = Uuid, Path, description = "The event id."),
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn delete_event_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db
        .delete_event(user_id, event_id)
        .await
        .map_err(|e| port_failure("delete event", e))?;
    Ok(StatusCode::NO_CONTENT)
}
