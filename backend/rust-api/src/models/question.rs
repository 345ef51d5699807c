use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::bson_datetime_as_chrono;

fn default_marks() -> i32 {
    1
}

/// Question model stored in the MongoDB "questions" collection.
/// Each question belongs to exactly one quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(rename = "quizId")]
    pub quiz_id: ObjectId,

    #[serde(rename = "questionText")]
    pub question_text: String,

    pub options: Vec<String>,

    /// Index into `options`; validated at data entry.
    #[serde(rename = "correctOption")]
    pub correct_option: i32,

    #[serde(default)]
    pub explanation: String,

    #[serde(default = "default_marks")]
    pub marks: i32,

    #[serde(rename = "createdAt", with = "bson_datetime_as_chrono")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_correct_option"))]
pub struct CreateQuestionRequest {
    #[serde(rename = "quizId")]
    pub quiz_id: String,
    #[serde(rename = "questionText")]
    #[validate(length(min = 1, message = "questionText must not be empty"))]
    pub question_text: String,
    #[validate(length(min = 2, message = "at least two options are required"))]
    pub options: Vec<String>,
    #[serde(rename = "correctOption")]
    pub correct_option: i32,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "marks must be at least 1"))]
    pub marks: Option<i32>,
}

/// correctOption must index into options.
fn validate_correct_option(req: &CreateQuestionRequest) -> Result<(), ValidationError> {
    if req.correct_option < 0 || req.correct_option as usize >= req.options.len() {
        return Err(ValidationError::new("correct_option_out_of_range"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkCreateQuestionsRequest {
    #[validate(length(min = 1, message = "questions must be a non-empty array"))]
    #[validate(nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[serde(rename = "questionText")]
    #[validate(length(min = 1, message = "questionText must not be empty"))]
    pub question_text: Option<String>,
    #[validate(length(min = 2, message = "at least two options are required"))]
    pub options: Option<Vec<String>>,
    #[serde(rename = "correctOption")]
    pub correct_option: Option<i32>,
    pub explanation: Option<String>,
    #[validate(range(min = 1, message = "marks must be at least 1"))]
    pub marks: Option<i32>,
}

/// ?quizId=... filter for GET and DELETE on /api/questions
#[derive(Debug, Deserialize)]
pub struct QuestionsByQuizQuery {
    #[serde(rename = "quizId")]
    pub quiz_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(options: usize, correct: i32) -> CreateQuestionRequest {
        CreateQuestionRequest {
            quiz_id: "65f000000000000000000001".to_string(),
            question_text: "What is 2 + 2?".to_string(),
            options: (0..options).map(|i| format!("option {}", i)).collect(),
            correct_option: correct,
            explanation: None,
            marks: None,
        }
    }

    #[test]
    fn correct_option_must_index_into_options() {
        assert!(request(4, 0).validate().is_ok());
        assert!(request(4, 3).validate().is_ok());
        assert!(request(4, 4).validate().is_err());
        assert!(request(4, -1).validate().is_err());
    }

    #[test]
    fn bulk_request_rejects_empty_array() {
        let bulk = BulkCreateQuestionsRequest { questions: vec![] };
        assert!(bulk.validate().is_err());
    }

    #[test]
    fn bulk_request_validates_each_question() {
        let bulk = BulkCreateQuestionsRequest {
            questions: vec![request(4, 1), request(4, 9)],
        };
        assert!(bulk.validate().is_err());
    }

    #[test]
    fn marks_must_be_positive() {
        let mut create = request(4, 0);
        create.marks = Some(0);
        assert!(create.validate().is_err());
        create.marks = Some(-5);
        assert!(create.validate().is_err());
        create.marks = Some(2);
        assert!(create.validate().is_ok());

        let update = UpdateQuestionRequest {
            question_text: None,
            options: None,
            correct_option: None,
            explanation: None,
            marks: Some(0),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn marks_default_to_one_when_missing() {
        let doc = mongodb::bson::doc! {
            "_id": ObjectId::new(),
            "quizId": ObjectId::new(),
            "questionText": "q",
            "options": ["a", "b"],
            "correctOption": 0,
            "createdAt": mongodb::bson::DateTime::now(),
        };
        let question: Question = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(question.marks, 1);
        assert_eq!(question.explanation, "");
    }
}
