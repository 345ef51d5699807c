use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{bson_datetime_as_chrono, question::Question, Category};

/// Quiz model stored in the MongoDB "quizzes" collection.
///
/// Questions live in their own collection and reference the quiz by id;
/// `resources` holds the ordered score-band study material used by the
/// recommendation selector (declaration order is match precedence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub title: String,

    pub category: Category,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Time limit in minutes
    #[serde(rename = "timeLimit")]
    pub time_limit: i32,

    #[serde(default)]
    pub resources: Vec<ScoreBandResource>,

    #[serde(rename = "createdAt", with = "bson_datetime_as_chrono")]
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    /// "category - subcategory" key used across performance maps.
    /// Falls back to the category name when no subcategory is set.
    pub fn category_key(&self) -> String {
        let subcategory = self.subcategory.as_deref().unwrap_or(self.category.as_str());
        format!("{} - {}", self.category, subcategory)
    }
}

/// One score band of study material: matched when
/// minScore <= score <= maxScore.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreBandResource {
    #[serde(rename = "minScore")]
    pub min_score: i32,
    #[serde(rename = "maxScore")]
    pub max_score: i32,
    pub recommendation: String,
    #[serde(rename = "resourceLink")]
    pub resource_link: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(rename = "timeLimit")]
    #[validate(range(min = 1, message = "timeLimit must be at least one minute"))]
    pub time_limit: i32,
    #[serde(default)]
    #[validate(custom(function = "validate_score_bands"))]
    pub resources: Vec<ScoreBandResource>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub category: Option<Category>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(rename = "timeLimit")]
    #[validate(range(min = 1, message = "timeLimit must be at least one minute"))]
    pub time_limit: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "validate_score_bands"))]
    pub resources: Option<Vec<ScoreBandResource>>,
}

/// Bands may overlap (first match wins), but each band must be a valid range.
pub fn validate_score_bands(bands: &[ScoreBandResource]) -> Result<(), ValidationError> {
    for band in bands {
        if band.min_score > band.max_score {
            return Err(ValidationError::new("min_score_exceeds_max_score"));
        }
    }
    Ok(())
}

/// GET /api/quizzes/{id}/full
#[derive(Debug, Serialize)]
pub struct QuizWithQuestionsResponse {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

/// GET /api/quizzes/{id}/questions
#[derive(Debug, Serialize)]
pub struct QuizQuestionsResponse {
    #[serde(rename = "quizDetails")]
    pub quiz_details: Quiz,
    pub questions: Vec<Question>,
    #[serde(rename = "totalMarks")]
    pub total_marks: i32,
    #[serde(rename = "timeLimit")]
    pub time_limit: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn band(min: i32, max: i32) -> ScoreBandResource {
        ScoreBandResource {
            min_score: min,
            max_score: max,
            recommendation: "Practice more".to_string(),
            resource_link: "https://example.com".to_string(),
        }
    }

    #[test]
    fn category_key_uses_subcategory_when_present() {
        let quiz = Quiz {
            id: None,
            title: "Arrays 101".to_string(),
            category: Category::Coding,
            subcategory: Some("Arrays".to_string()),
            time_limit: 30,
            resources: vec![],
            created_at: Utc::now(),
        };
        assert_eq!(quiz.category_key(), "Coding - Arrays");
    }

    #[test]
    fn category_key_falls_back_to_category_name() {
        let quiz = Quiz {
            id: None,
            title: "Verbal basics".to_string(),
            category: Category::Verbal,
            subcategory: None,
            time_limit: 15,
            resources: vec![],
            created_at: Utc::now(),
        };
        assert_eq!(quiz.category_key(), "Verbal - Verbal");
    }

    #[test]
    fn score_bands_must_be_valid_ranges() {
        assert!(validate_score_bands(&[band(0, 5), band(3, 10)]).is_ok());
        assert!(validate_score_bands(&[band(6, 5)]).is_err());
    }
}
