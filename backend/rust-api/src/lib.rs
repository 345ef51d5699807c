use axum::{
    http::{header, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to specific origins in production

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/quizzes", quiz_routes())
        .nest("/api/questions", question_routes())
        .nest("/api/students", student_routes())
        .nest("/api/analysis", analysis_routes())
        .with_state(app_state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn quiz_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::quizzes::list_quizzes).post(handlers::quizzes::create_quiz),
        )
        .route(
            "/{id}",
            get(handlers::quizzes::get_quiz)
                .put(handlers::quizzes::update_quiz)
                .delete(handlers::quizzes::delete_quiz),
        )
        .route("/{id}/full", get(handlers::quizzes::get_quiz_with_questions))
        .route("/{id}/questions", get(handlers::quizzes::get_quiz_questions))
}

fn question_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::questions::list_questions)
                .post(handlers::questions::create_question)
                .delete(handlers::questions::delete_questions_by_quiz),
        )
        .route("/bulk", post(handlers::questions::create_questions_bulk))
        .route(
            "/{id}",
            get(handlers::questions::get_question)
                .put(handlers::questions::update_question)
                .delete(handlers::questions::delete_question),
        )
}

fn student_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/register", post(handlers::students::register_student))
        .route("/{rollno}", get(handlers::students::get_student))
        .route("/{rollno}/submit", post(handlers::students::submit_quiz))
        .route(
            "/{rollno}/performance",
            get(handlers::students::get_performance),
        )
        .route(
            "/{rollno}/quiz-history",
            get(handlers::students::get_quiz_history),
        )
        .route(
            "/{rollno}/recommendations",
            get(handlers::students::get_recommendations),
        )
        .route(
            "/{rollno}/resources/{resource_id}",
            patch(handlers::students::update_resource_completion),
        )
}

fn analysis_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        // Static /admin segments take precedence over the {rollno} captures
        .route("/admin/summary", get(handlers::analysis::admin_summary))
        .route("/admin/attempts", get(handlers::analysis::admin_attempts))
        .route(
            "/admin/quiz/{quiz_id}",
            get(handlers::analysis::admin_quiz_performance),
        )
        .route(
            "/admin/student/{rollno}",
            get(handlers::analysis::admin_student_analysis),
        )
        .route(
            "/admin/category-stats",
            get(handlers::analysis::admin_category_stats),
        )
        .route("/{rollno}/submit", post(handlers::analysis::submit_analysis))
        .route("/{rollno}", get(handlers::analysis::get_student_analysis))
        .route(
            "/{rollno}/{quiz_id}",
            get(handlers::analysis::get_quiz_analysis),
        )
}
