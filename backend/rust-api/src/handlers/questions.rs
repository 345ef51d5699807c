use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::extractors::AppJson;
use crate::handlers::ApiError;
use crate::models::question::{
    BulkCreateQuestionsRequest, CreateQuestionRequest, QuestionsByQuizQuery, UpdateQuestionRequest,
};
use crate::services::{question_service::QuestionService, AppState};

/// POST /api/questions
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))?;

    tracing::info!("Creating question for quiz: {}", req.quiz_id);

    let service = QuestionService::new(state.mongo.clone());
    let question = service.create_question(req).await?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// POST /api/questions/bulk - all-or-nothing batch insert
pub async fn create_questions_bulk(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<BulkCreateQuestionsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))?;

    tracing::info!("Creating {} questions in bulk", req.questions.len());

    let service = QuestionService::new(state.mongo.clone());
    let questions = service.create_questions_bulk(req).await?;

    Ok((StatusCode::CREATED, Json(questions)))
}

/// GET /api/questions/{id}
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = QuestionService::new(state.mongo.clone());
    let question = service.get_question(&question_id).await?;

    Ok(Json(question))
}

/// GET /api/questions?quizId=...
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuestionsByQuizQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = QuestionService::new(state.mongo.clone());
    let questions = service.list_questions_by_quiz(&query.quiz_id).await?;

    Ok(Json(questions))
}

/// PUT /api/questions/{id}
pub async fn update_question(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
    AppJson(req): AppJson<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))?;

    tracing::info!("Updating question: {}", question_id);

    let service = QuestionService::new(state.mongo.clone());
    let question = service.update_question(&question_id, req).await?;

    Ok(Json(question))
}

/// DELETE /api/questions/{id}
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Deleting question: {}", question_id);

    let service = QuestionService::new(state.mongo.clone());
    service.delete_question(&question_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Question deleted successfully"
    })))
}

/// DELETE /api/questions?quizId=...
pub async fn delete_questions_by_quiz(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuestionsByQuizQuery>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Deleting questions for quiz: {}", query.quiz_id);

    let service = QuestionService::new(state.mongo.clone());
    let deleted = service.delete_questions_by_quiz(&query.quiz_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Questions deleted successfully",
        "deletedCount": deleted
    })))
}
