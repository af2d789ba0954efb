//! services/api/src/web/middleware.rs
//!
//! Identity middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::web::state::AppState;

/// Header set by the upstream identity provider once it has authenticated the caller.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Middleware that reads the caller's id from the identity header.
///
/// If valid, makes sure the user exists and inserts the user_id into request
/// extensions for handlers to use. If invalid or missing, returns 401 Unauthorized.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    state.db.get_or_create_user(user_id).await.map_err(|e| {
        error!("Failed to load user {}: {:?}", user_id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    req.extensions_mut().insert(user_id);
    Ok(next.run(req).await)
}
