//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, plus the health probe.

use axum::response::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::web::{contacts, events, goals, interactions};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        contacts::import_contacts_handler,
        contacts::list_contacts_handler,
        contacts::contact_view_handler,
        contacts::suggestion_handler,
        interactions::log_interaction_handler,
        interactions::list_interactions_handler,
        goals::create_goal_handler,
        goals::list_goals_handler,
        goals::due_goals_handler,
        goals::toggle_goal_handler,
        goals::delete_goal_handler,
        events::create_event_handler,
        events::upcoming_events_handler,
        events::mark_wished_handler,
        events::delete_event_handler,
    ),
    components(
        schemas(
            HealthResponse,
            contacts::ImportContactsRequest,
            contacts::ImportContactsResponse,
            contacts::ContactsResponse,
            contacts::ContactViewResponse,
            contacts::SuggestionResponse,
            interactions::LogInteractionRequest,
            interactions::InteractionResponse,
            interactions::InteractionsResponse,
            goals::CreateGoalRequest,
            goals::GoalResponse,
            goals::GoalsResponse,
            events::CreateEventRequest,
            events::EventResponse,
            events::UpcomingEventsResponse,
        )
    ),
    tags(
        (name = "Family Loop API", description = "Contact classification, attention ranking, goals and family events.")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
}

/// Liveness probe. Does not require the identity header.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
