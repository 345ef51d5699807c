use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::bson_datetime_as_chrono;

/// Student model stored in the MongoDB "students" collection.
///
/// The roll number is the natural key. Quiz attempts are embedded and
/// append-only; `performance` holds the derived weak/strong area maps keyed
/// by "category - subcategory"; `resources` holds at most one live
/// personalized recommendation per quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub rollno: String,
    pub name: String,
    pub email: String,

    #[serde(rename = "quizAttempts", default)]
    pub quiz_attempts: Vec<QuizAttempt>,

    #[serde(default)]
    pub performance: Performance,

    #[serde(default)]
    pub resources: Vec<PersonalizedResource>,

    #[serde(rename = "createdAt", with = "bson_datetime_as_chrono")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt", with = "bson_datetime_as_chrono")]
    pub updated_at: DateTime<Utc>,
}

/// Derived weak/strong area maps; value is the percentage scored the last
/// time the key was classified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Performance {
    #[serde(rename = "weakAreas", default)]
    pub weak_areas: HashMap<String, f64>,
    #[serde(rename = "strongAreas", default)]
    pub strong_areas: HashMap<String, f64>,
}

/// One scored quiz attempt, created on submission and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    #[serde(rename = "quizId")]
    pub quiz_id: ObjectId,

    pub score: i32,

    /// Seconds spent on the attempt
    #[serde(rename = "timeTaken")]
    pub time_taken: i64,

    pub responses: Vec<GradedResponse>,

    #[serde(rename = "attemptedAt", with = "bson_datetime_as_chrono")]
    pub attempted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedResponse {
    #[serde(rename = "questionId")]
    pub question_id: ObjectId,
    #[serde(rename = "selectedOption")]
    pub selected_option: i32,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// Study material picked for a student from a quiz's score bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizedResource {
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(rename = "quizId")]
    pub quiz_id: ObjectId,
    pub recommendation: String,
    #[serde(rename = "resourceLink")]
    pub resource_link: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(length(min = 1, message = "rollno must not be empty"))]
    pub rollno: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(rename = "quizId")]
    pub quiz_id: String,
    pub responses: Vec<ResponseInput>,
    /// Seconds spent on the attempt
    #[serde(rename = "timeTaken", default)]
    pub time_taken: i64,
}

/// One raw answer as submitted by the student front-end.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseInput {
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "selectedOption")]
    pub selected_option: i32,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub message: String,
    pub score: i32,
    #[serde(rename = "weakAreas")]
    pub weak_areas: HashMap<String, f64>,
    #[serde(rename = "strongAreas")]
    pub strong_areas: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct StudentPerformanceResponse {
    #[serde(rename = "weakAreas")]
    pub weak_areas: HashMap<String, f64>,
    #[serde(rename = "strongAreas")]
    pub strong_areas: HashMap<String, f64>,
    #[serde(rename = "totalAttempts")]
    pub total_attempts: usize,
    #[serde(rename = "lastAttempt")]
    pub last_attempt: Option<QuizAttempt>,
}

/// One row of GET /api/students/{rollno}/quiz-history, an attempt joined
/// with its quiz.
#[derive(Debug, Serialize)]
pub struct QuizHistoryEntry {
    #[serde(rename = "quizId")]
    pub quiz_id: String,
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub score: i32,
    #[serde(rename = "attemptedAt")]
    pub attempted_at: DateTime<Utc>,
    #[serde(rename = "timeTaken")]
    pub time_taken: i64,
    pub responses: Vec<GradedResponse>,
}

/// One row of GET /api/students/{rollno}/recommendations.
#[derive(Debug, Serialize)]
pub struct RecommendationEntry {
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(rename = "quizTitle")]
    pub quiz_title: String,
    pub category: String,
    pub subcategory: String,
    pub score: i32,
    pub recommendation: String,
    #[serde(rename = "resourceLink")]
    pub resource_link: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResourceCompletionRequest {
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}
