//! services/api/src/web/goals.rs
//!
//! Handlers for communication goals.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use family_loop_core::{
    goals::{goal_status, is_due, parse_goal_options, GoalStatus},
    CommunicationGoal, Interaction,
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

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub contact_id: String,
    /// daily, every-3-days, weekly or monthly.
    pub frequency: String,
    /// any (default), call or text.
    pub method: Option<String>,
    pub custom_note: Option<String>,
}

/// A goal together with where it stands right now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: CommunicationGoal,
    pub frequency_label: &'static str,
    pub status: GoalStatus,
    pub status_text: String,
    pub status_color: &'static str,
    pub is_due: bool,
}

impl GoalView {
    fn new(goal: CommunicationGoal, interactions: &[Interaction], now: DateTime<Utc>) -> Self {
        let status = goal_status(&goal, interactions, now);
        let due = is_due(&goal, interactions, now);
        Self {
            frequency_label: goal.frequency.label(),
            goal,
            status,
            status_text: status.describe(),
            status_color: status.color(),
            is_due: due,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GoalResponse {
    #[schema(value_type = Object)]
    pub goal: GoalView,
}

#[derive(Serialize, ToSchema)]
pub struct GoalsResponse {
    #[schema(value_type = Vec<Object>)]
    pub goals: Vec<GoalView>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

async fn load_views(app_state: &AppState, user_id: Uuid) -> Result<Vec<GoalView>, HttpError> {
    let goals = app_state
        .db
        .list_goals(user_id)
        .await
        .map_err(|e| port_failure("load goals", e))?;
    let interactions = app_state
        .db
        .list_interactions(user_id)
        .await
        .map_err(|e| port_failure("load interactions", e))?;

    let now = Utc::now();
    Ok(goals
        .into_iter()
        .map(|goal| GoalView::new(goal, &interactions, now))
        .collect())
}

/// Set a new contact-frequency goal for a contact.
#[utoipa::path(
    post,
    path = "/goals",
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = GoalResponse),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 404, description = "Contact not found"),
        (status = 422, description = "Unknown frequency or method")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn create_goal_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let (frequency, method) = parse_goal_options(&payload.frequency, payload.method.as_deref())
        .map_err(invalid_input)?;

    let db = &app_state.db;
    let contact = db
        .get_contact(user_id, &payload.contact_id)
        .await
        .map_err(|e| port_failure("load contact", e))?;
    let interactions = db
        .list_interactions(user_id)
        .await
        .map_err(|e| port_failure("load interactions", e))?;

    let now = Utc::now();
    let goal = CommunicationGoal::new(
        &contact,
        frequency,
        method,
        payload.custom_note.as_deref(),
        now,
    );
    db.create_goal(user_id, goal.clone())
        .await
        .map_err(|e| port_failure("create goal", e))?;

    info!(%user_id, goal_id = %goal.id, frequency = frequency.as_str(), "Created goal");
    Ok((
        StatusCode::CREATED,
        Json(GoalResponse {
            goal: GoalView::new(goal, &interactions, now),
        }),
    ))
}

/// All goals with their current status.
#[utoipa::path(
    get,
    path = "/goals",
    responses(
        (status = 200, description = "Goals with status", body = GoalsResponse),
        (status = 401, description = "Missing or invalid x-user-id header")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn list_goals_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let goals = load_views(&app_state, user_id).await?;
    Ok(Json(GoalsResponse { goals }))
}

/// Goals that need attention now.
#[utoipa::path(
    get,
    path = "/goals/due",
    responses(
        (status = 200, description = "Due goals", body = GoalsResponse),
        (status = 401, description = "Missing or invalid x-user-id header")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn due_goals_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let mut goals = load_views(&app_state, user_id).await?;
    goals.retain(|view| view.is_due);
    Ok(Json(GoalsResponse { goals }))
}

/// Pause or resume a goal.
#[utoipa::path(
    post,
    path = "/goals/{id}/toggle",
    responses(
        (status = 200, description = "Goal toggled", body = GoalResponse),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 404, description = "Goal not found")
    ),
    params(
        ("id" = Uuid, Path, description = "The goal id."),
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn toggle_goal_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let db = &app_state.db;
    let goal = db
        .toggle_goal(user_id, goal_id)
        .await
        .map_err(|e| port_failure("toggle goal", e))?;
    let interactions = db
        .list_interactions(user_id)
        .await
        .map_err(|e| port_failure("load interactions", e))?;

    Ok(Json(GoalResponse {
        goal: GoalView::new(goal, &interactions, Utc::now()),
    }))
}

/// Remove a goal.
#[utoipa::path(
    delete,
    path = "/goals/{id}",
    responses(
        (status = 204, description = "Goal deleted"),
        (status = 401, description = "Missing or invalid x-user-id header"),
        (status = 404, description = "Goal not found")
    ),
    params(
        ("id" = Uuid, Path, description = "The goal id."),
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn delete_goal_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db
        .delete_goal(user_id, goal_id)
        .await
        .map_err(|e| port_failure("delete goal", e))?;
    Ok(StatusCode::NO_CONTENT)
}
