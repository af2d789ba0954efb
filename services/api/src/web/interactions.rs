//! services/api/src/web/interactions.rs
//!
//! Handlers for the append-only interaction log.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use family_loop_core::{Interaction, InteractionType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{invalid_input, port_failure, HttpError};
use crate::web::state::AppState;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LogInteractionRequest {
    /// call, text, in-person, video-call or other.
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: InteractionType,
    /// Optional, at most 100 characters after trimming.
    pub note: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct InteractionResponse {
    #[schema(value_type = Object)]
    pub interaction: Interaction,
}

#[derive(Serialize, ToSchema)]
pub struct InteractionsResponse {
    #[schema(value_type = Vec<Object>)]
    pub interactions: Vec<Interaction>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct InteractionsQuery {
    /// Only return interactions with this contact.
    pub contact_id: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Log that the user got in touch with a contact just now.
#[utoipa::path(
    post,
    path = "/contacts/{id}/interactions",
    request_body = LogInteractionRequest,
    responses(
        (status = 201, description = "Interaction logged", body = InteractionResponse),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 404, description = "Contact not found"),
        (status = 422, description = "Unknown type or note too long")
    ),
    params(
        ("id" = String, Path, description = "The device contact id."),
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn log_interaction_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(contact_id): Path<String>,
    Json(payload): Json<LogInteractionRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let db = &app_state.db;
    let contact = db
        .get_contact(user_id, &contact_id)
        .await
        .map_err(|e| port_failure("load contact", e))?;

    let interaction =
        Interaction::record(contact.id, payload.kind, payload.note.as_deref(), Utc::now())
            .map_err(invalid_input)?;
    db.append_interaction(user_id, interaction.clone())
        .await
        .map_err(|e| port_failure("log interaction", e))?;

    info!(%user_id, contact_id = %interaction.contact_id, kind = interaction.kind.as_str(), "Logged interaction");
    Ok((StatusCode::CREATED, Json(InteractionResponse { interaction })))
}

/// The interaction log, in the order entries were logged.
#[utoipa::path(
    get,
    path = "/interactions",
    responses(
        (status = 200, description = "Logged interactions", body = InteractionsResponse),
        (status = 401, description = "Missing or invalid x-user-id header")
    ),
    params(
        InteractionsQuery,
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn list_interactions_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<InteractionsQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let mut interactions = app_state
        .db
        .list_interactions(user_id)
        .await
        .map_err(|e| port_failure("load interactions", e))?;

    if let Some(contact_id) = query.contact_id {
        interactions.retain(|i| i.contact_id == contact_id);
    }
    Ok(Json(InteractionsResponse { interactions }))
}
