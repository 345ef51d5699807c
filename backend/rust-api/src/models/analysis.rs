use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{bson_datetime_as_chrono, student::GradedResponse};

/// Analysis aggregate stored in the MongoDB "analyses" collection.
///
/// One document is written per submission; `previous_scores` carries the
/// whole score history for the student-quiz pair forward, so the latest
/// document is the authoritative aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub rollno: String,

    #[serde(rename = "quizId")]
    pub quiz_id: ObjectId,

    pub responses: Vec<GradedResponse>,

    pub score: i32,

    #[serde(rename = "previousScores", default)]
    pub previous_scores: Vec<ScoreHistoryEntry>,

    /// Seconds spent on the attempt
    #[serde(rename = "timeTaken")]
    pub time_taken: i64,

    /// Mean of `previous_scores`
    #[serde(rename = "averageScore")]
    pub average_score: f64,

    /// Score delta against the previous attempt at the same quiz
    #[serde(rename = "improvementTrend")]
    pub improvement_trend: i32,

    /// "category - subcategory" -> percentage for this submission
    #[serde(rename = "categoryPerformance", default)]
    pub category_performance: HashMap<String, f64>,

    #[serde(rename = "createdAt", with = "bson_datetime_as_chrono")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreHistoryEntry {
    #[serde(rename = "quizId")]
    pub quiz_id: ObjectId,
    pub score: i32,
    #[serde(rename = "attemptedAt", with = "bson_datetime_as_chrono")]
    pub attempted_at: DateTime<Utc>,
}

/// POST /api/analysis/{rollno}/submit. Graded responses arrive already
/// scored by the scoring engine.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnalysisRequest {
    #[serde(rename = "quizId")]
    pub quiz_id: String,
    pub responses: Vec<GradedResponseInput>,
    pub score: i32,
    #[serde(rename = "timeTaken", default)]
    pub time_taken: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradedResponseInput {
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "selectedOption")]
    pub selected_option: i32,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// GET /api/analysis/{rollno}/{quizId}
#[derive(Debug, Serialize)]
pub struct QuizAnalysisResponse {
    #[serde(rename = "quizTitle")]
    pub quiz_title: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub score: i32,
    #[serde(rename = "timeTaken")]
    pub time_taken: i64,
    #[serde(rename = "improvementTrend")]
    pub improvement_trend: i32,
    #[serde(rename = "categoryPerformance")]
    pub category_performance: HashMap<String, f64>,
    pub responses: Vec<GradedResponse>,
}

/// GET /api/analysis/{rollno} and /api/analysis/admin/student/{rollno}
#[derive(Debug, Serialize)]
pub struct StudentAnalysisResponse {
    pub rollno: String,
    #[serde(rename = "totalAttempts")]
    pub total_attempts: usize,
    #[serde(rename = "averageScore")]
    pub average_score: f64,
    #[serde(rename = "categoryPerformance")]
    pub category_performance: HashMap<String, f64>,
    #[serde(rename = "quizHistory")]
    pub quiz_history: Vec<AnalysisHistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisHistoryEntry {
    #[serde(rename = "quizTitle")]
    pub quiz_title: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub score: i32,
    #[serde(rename = "timeTaken")]
    pub time_taken: i64,
    #[serde(rename = "attemptedAt")]
    pub attempted_at: DateTime<Utc>,
}

/// GET /api/analysis/admin/summary
#[derive(Debug, Serialize)]
pub struct AdminSummaryResponse {
    #[serde(rename = "totalQuizzes")]
    pub total_quizzes: u64,
    #[serde(rename = "totalAttempts")]
    pub total_attempts: usize,
    #[serde(rename = "averageScore")]
    pub average_score: f64,
    #[serde(rename = "mostAttemptedQuiz")]
    pub most_attempted_quiz: MostAttemptedQuiz,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostAttemptedQuiz {
    pub title: String,
    pub attempts: usize,
}

impl Default for MostAttemptedQuiz {
    fn default() -> Self {
        MostAttemptedQuiz {
            title: "No attempts yet".to_string(),
            attempts: 0,
        }
    }
}

/// GET /api/analysis/admin/attempts
#[derive(Debug, Serialize)]
pub struct AllAttemptsResponse {
    #[serde(rename = "totalAttempts")]
    pub total_attempts: usize,
    pub attempts: Vec<AttemptRow>,
}

#[derive(Debug, Serialize)]
pub struct AttemptRow {
    pub rollno: String,
    pub name: String,
    #[serde(rename = "quizId")]
    pub quiz_id: String,
    #[serde(rename = "quizTitle")]
    pub quiz_title: String,
    pub category: String,
    pub subcategory: String,
    pub score: i32,
    pub responses: Vec<GradedResponse>,
    #[serde(rename = "timeTaken")]
    pub time_taken: i64,
    #[serde(rename = "attemptedAt")]
    pub attempted_at: DateTime<Utc>,
}

/// GET /api/analysis/admin/quiz/{quizId}
#[derive(Debug, Serialize)]
pub struct QuizPerformanceResponse {
    #[serde(rename = "quizTitle")]
    pub quiz_title: String,
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(rename = "totalAttempts")]
    pub total_attempts: usize,
    #[serde(rename = "performanceData")]
    pub performance_data: Vec<QuizPerformanceRow>,
}

#[derive(Debug, Serialize)]
pub struct QuizPerformanceRow {
    pub rollno: String,
    pub name: String,
    pub score: i32,
    #[serde(rename = "timeTaken")]
    pub time_taken: i64,
    #[serde(rename = "categoryPerformance")]
    pub category_performance: HashMap<String, f64>,
    #[serde(rename = "attemptedAt")]
    pub attempted_at: DateTime<Utc>,
}

/// GET /api/analysis/admin/category-stats
#[derive(Debug, Serialize)]
pub struct CategoryStatsResponse {
    #[serde(rename = "totalQuizzes")]
    pub total_quizzes: usize,
    #[serde(rename = "totalAttempts")]
    pub total_attempts: usize,
    #[serde(rename = "quizCompletionRate")]
    pub quiz_completion_rate: f64,
    #[serde(rename = "categoryStats")]
    pub category_stats: BTreeMap<String, CategoryBreakdown>,
}

/// A category renders either a stats object or, when no quiz exists for
/// it, a literal sentinel string.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryBreakdown {
    NoQuizzes(String),
    Stats(CategoryStats),
}

impl CategoryBreakdown {
    pub fn no_quizzes() -> Self {
        CategoryBreakdown::NoQuizzes("No quizzes created yet.".to_string())
    }
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct CategoryStats {
    #[serde(rename = "totalAttempts")]
    pub total_attempts: usize,
    #[serde(rename = "averageScore", skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(rename = "highestScore", skip_serializing_if = "Option::is_none")]
    pub highest_score: Option<i32>,
    #[serde(rename = "lowestScore", skip_serializing_if = "Option::is_none")]
    pub lowest_score: Option<i32>,
    #[serde(rename = "averageTimeTaken", skip_serializing_if = "Option::is_none")]
    pub average_time_taken: Option<f64>,
    pub subcategories: BTreeMap<String, SubcategoryBreakdown>,
}

/// Zero-count subcategories keep an explicit sentinel instead of zeros.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubcategoryBreakdown {
    NoAttempts {
        #[serde(rename = "totalAttempts")]
        total_attempts: usize,
        message: String,
    },
    Stats(SubcategoryStats),
}

impl SubcategoryBreakdown {
    pub fn no_attempts() -> Self {
        SubcategoryBreakdown::NoAttempts {
            total_attempts: 0,
            message: "No attempts yet".to_string(),
        }
    }
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct SubcategoryStats {
    #[serde(rename = "totalAttempts")]
    pub total_attempts: usize,
    #[serde(rename = "averageScore")]
    pub average_score: f64,
    #[serde(rename = "highestScore")]
    pub highest_score: i32,
    #[serde(rename = "lowestScore")]
    pub lowest_score: i32,
    #[serde(rename = "averageTimeTaken")]
    pub average_time_taken: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_breakdown_sentinel_serializes_as_plain_string() {
        let json = serde_json::to_value(CategoryBreakdown::no_quizzes()).unwrap();
        assert_eq!(json, serde_json::json!("No quizzes created yet."));
    }

    #[test]
    fn subcategory_sentinel_keeps_zero_count_and_message() {
        let json = serde_json::to_value(SubcategoryBreakdown::no_attempts()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "totalAttempts": 0, "message": "No attempts yet" })
        );
    }
}
