use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::extractors::AppJson;
use crate::handlers::ApiError;
use crate::models::quiz::{CreateQuizRequest, UpdateQuizRequest};
use crate::services::{quiz_service::QuizService, AppState};

/// POST /api/quizzes
pub async fn create_quiz(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))?;

    tracing::info!("Creating quiz: title={}", req.title);

    let service = QuizService::new(state.mongo.clone());
    let quiz = service.create_quiz(req).await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// GET /api/quizzes
pub async fn list_quizzes(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let service = QuizService::new(state.mongo.clone());
    let quizzes = service.list_quizzes().await?;

    Ok(Json(quizzes))
}

/// GET /api/quizzes/{id}
pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = QuizService::new(state.mongo.clone());
    let quiz = service.get_quiz(&quiz_id).await?;

    Ok(Json(quiz))
}

/// GET /api/quizzes/{id}/full
pub async fn get_quiz_with_questions(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = QuizService::new(state.mongo.clone());
    let response = service.get_quiz_with_questions(&quiz_id).await?;

    Ok(Json(response))
}

/// GET /api/quizzes/{id}/questions
pub async fn get_quiz_questions(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = QuizService::new(state.mongo.clone());
    let response = service.get_questions_for_quiz(&quiz_id).await?;

    Ok(Json(response))
}

/// PUT /api/quizzes/{id}
pub async fn update_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
    AppJson(req): AppJson<UpdateQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))?;

    tracing::info!("Updating quiz: {}", quiz_id);

    let service = QuizService::new(state.mongo.clone());
    let quiz = service.update_quiz(&quiz_id, req).await?;

    Ok(Json(quiz))
}

/// DELETE /api/quizzes/{id} - deletes the quiz and all of its questions
pub async fn delete_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Deleting quiz: {}", quiz_id);

    let service = QuizService::new(state.mongo.clone());
    service.delete_quiz(&quiz_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Quiz and associated questions deleted successfully"
    })))
}
