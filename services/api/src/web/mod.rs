pub mod contacts;
pub mod events;
pub mod goals;
pub mod interactions;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::require_user;
pub use rest::ApiDoc;
pub use state::AppState;

/// Builds every API route. Everything except `/health` sits behind [`require_user`].
pub fn router(app_state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/contacts", get(contacts::list_contacts_handler))
        .route("/contacts/import", post(contacts::import_contacts_handler))
        .route("/contacts/view", get(contacts::contact_view_handler))
        .route("/contacts/{id}/suggestion", get(contacts::suggestion_handler))
        .route(
            "/contacts/{id}/interactions",
            post(interactions::log_interaction_handler),
        )
        .route("/interactions", get(interactions::list_interactions_handler))
        .route(
            "/goals",
            get(goals::list_goals_handler).post(goals::create_goal_handler),
        )
        .route("/goals/due", get(goals::due_goals_handler))
        .route("/goals/{id}", delete(goals::delete_goal_handler))
        .route("/goals/{id}/toggle", post(goals::toggle_goal_handler))
        .route("/events", post(events::create_event_handler))
        .route("/events/upcoming", get(events::upcoming_events_handler))
        .route("/events/{id}", delete(events::delete_event_handler))
        .route("/events/{id}/wished", post(events::mark_wished_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_user,
        ));

    Router::new()
        .route("/health", get(rest::health_handler))
        .merge(protected_routes)
        .with_state(app_state)
}
