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
use crate::models::student::{
    RegisterStudentRequest, SubmitQuizRequest, UpdateResourceCompletionRequest,
};
use crate::services::{
    recommendation_service::RecommendationService, student_service::StudentService, AppState,
};

/// POST /api/students/register
pub async fn register_student(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterStudentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))?;

    tracing::info!("Registering student: rollno={}", req.rollno);

    let service = StudentService::new(state.mongo.clone());
    let student = service.register_student(req).await?;

    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /api/students/{rollno}
pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(rollno): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = StudentService::new(state.mongo.clone());
    let student = service.get_student(&rollno).await?;

    Ok(Json(student))
}

/// POST /api/students/{rollno}/submit
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Path(rollno): Path<String>,
    AppJson(req): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.responses.is_empty() {
        return Err(ApiError::bad_request("Invalid quiz submission data"));
    }

    tracing::info!("Quiz submission: rollno={}, quiz={}", rollno, req.quiz_id);

    let service = StudentService::new(state.mongo.clone());
    let response = service.submit_quiz(&rollno, req).await?;

    Ok(Json(response))
}

/// GET /api/students/{rollno}/performance
pub async fn get_performance(
    State(state): State<Arc<AppState>>,
    Path(rollno): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = StudentService::new(state.mongo.clone());
    let performance = service.get_performance(&rollno).await?;

    Ok(Json(performance))
}

/// GET /api/students/{rollno}/quiz-history
pub async fn get_quiz_history(
    State(state): State<Arc<AppState>>,
    Path(rollno): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = StudentService::new(state.mongo.clone());
    let history = service.get_quiz_history(&rollno).await?;

    Ok(Json(history))
}

/// GET /api/students/{rollno}/recommendations
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(rollno): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = RecommendationService::new(state.mongo.clone());
    let recommendations = service.list_recommendations(&rollno).await?;

    Ok(Json(recommendations))
}

/// PATCH /api/students/{rollno}/resources/{resourceId}
pub async fn update_resource_completion(
    State(state): State<Arc<AppState>>,
    Path((rollno, resource_id)): Path<(String, String)>,
    AppJson(req): AppJson<UpdateResourceCompletionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        "Updating resource completion: rollno={}, resource={}, isCompleted={}",
        rollno,
        resource_id,
        req.is_completed
    );

    let service = RecommendationService::new(state.mongo.clone());
    let resource = service
        .set_completion(&rollno, &resource_id, req.is_completed)
        .await?;

    Ok(Json(resource))
}
