//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, InMemoryStore, OpenAiMessageAdapter, TemplateMessageAdapter},
    config::Config,
    error::ApiError,
    web::{router, ApiDoc, AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    Router,
};
use family_loop_core::ports::{DatabaseService, MessageSuggestionService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Pick the Storage Adapter ---
    let db: Arc<dyn DatabaseService> = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        None => {
            warn!("DATABASE_URL is not set; data is kept in memory and lost on restart.");
            Arc::new(InMemoryStore::new())
        }
    };

    // --- 3. Initialize the Message Suggestion Adapter ---
    let suggestions: Arc<dyn MessageSuggestionService> = match &config.openai_api_key {
        Some(key) => {
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(key));
            info!("Message suggestions use model {}", config.message_model);
            Arc::new(OpenAiMessageAdapter::new(
                openai_client,
                config.message_model.clone(),
            ))
        }
        None => {
            info!("OPENAI_API_KEY is not set; message suggestions use templates.");
            Arc::new(TemplateMessageAdapter)
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db,
        config: config.clone(),
        suggestions,
    });

    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(api_lib::web::middleware::USER_ID_HEADER),
        ]);

    // --- 5. Create the Web Router ---
    let api_router = router(app_state)
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
