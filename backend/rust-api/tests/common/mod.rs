use axum::Router;
use quizplatform_api::{config::Config, create_router, services::AppState};
use std::sync::Arc;

/// Builds the full router against a lazily connecting MongoDB client.
///
/// The driver only dials the server on first operation, so tests that are
/// rejected before reaching the database (validation, auth, bad IDs) run
/// without any backing services.
pub async fn create_test_app() -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config::load().expect("Failed to load test configuration");

    let mongo_client = mongodb::Client::with_uri_str(&config.mongo_uri)
        .await
        .expect("Failed to create test MongoDB client");

    let app_state = Arc::new(AppState::new(config, mongo_client));

    create_router(app_state)
}
