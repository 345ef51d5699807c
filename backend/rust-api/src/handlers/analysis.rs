use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::extractors::AppJson;
use crate::handlers::ApiError;
use crate::models::analysis::SubmitAnalysisRequest;
use crate::models::student::GradedResponse;
use crate::services::{analysis_service::AnalysisService, AppState};

/// POST /api/analysis/{rollno}/submit
///
/// Thin wrapper over the same path the in-process submission flow uses;
/// exists for clients that grade externally and push the result.
pub async fn submit_analysis(
    State(state): State<Arc<AppState>>,
    Path(rollno): Path<String>,
    AppJson(req): AppJson<SubmitAnalysisRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Analysis submission: rollno={}, quiz={}", rollno, req.quiz_id);

    let mut responses = Vec::with_capacity(req.responses.len());
    for input in &req.responses {
        let question_id = ObjectId::parse_str(&input.question_id)
            .map_err(|_| ApiError::bad_request("Invalid question ID format"))?;
        responses.push(GradedResponse {
            question_id,
            selected_option: input.selected_option,
            is_correct: input.is_correct,
        });
    }

    let service = AnalysisService::new(state.mongo.clone());
    let analysis = service
        .record_submission(&rollno, &req.quiz_id, responses, req.score, req.time_taken)
        .await?;

    Ok((StatusCode::CREATED, Json(analysis)))
}

/// GET /api/analysis/{rollno}/{quizId}
pub async fn get_quiz_analysis(
    State(state): State<Arc<AppState>>,
    Path((rollno, quiz_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AnalysisService::new(state.mongo.clone());
    let analysis = service.get_quiz_analysis(&rollno, &quiz_id).await?;

    Ok(Json(analysis))
}

/// GET /api/analysis/{rollno}
pub async fn get_student_analysis(
    State(state): State<Arc<AppState>>,
    Path(rollno): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AnalysisService::new(state.mongo.clone());
    let analysis = service.get_student_analysis(&rollno).await?;

    Ok(Json(analysis))
}

/// GET /api/analysis/admin/summary
pub async fn admin_summary(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AnalysisService::new(state.mongo.clone());
    let summary = service.admin_summary().await?;

    Ok(Json(summary))
}

/// GET /api/analysis/admin/attempts
pub async fn admin_attempts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AnalysisService::new(state.mongo.clone());
    let attempts = service.all_student_attempts().await?;

    Ok(Json(attempts))
}

/// GET /api/analysis/admin/quiz/{quizId}
pub async fn admin_quiz_performance(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AnalysisService::new(state.mongo.clone());
    let performance = service.quiz_performance(&quiz_id).await?;

    Ok(Json(performance))
}

/// GET /api/analysis/admin/student/{rollno}
pub async fn admin_student_analysis(
    State(state): State<Arc<AppState>>,
    Path(rollno): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AnalysisService::new(state.mongo.clone());
    let analysis = service.get_student_analysis(&rollno).await?;

    Ok(Json(analysis))
}

/// GET /api/analysis/admin/category-stats
pub async fn admin_category_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AnalysisService::new(state.mongo.clone());
    let stats = service.category_stats().await?;

    Ok(Json(stats))
}
