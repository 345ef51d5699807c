use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::Database;
use std::collections::HashMap;

use crate::metrics::{
    track_db_operation, QUIZ_SUBMISSIONS_TOTAL, RECOMMENDATIONS_SELECTED_TOTAL,
    STUDENTS_REGISTERED_TOTAL,
};
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use crate::models::student::{
    QuizAttempt, QuizHistoryEntry, RegisterStudentRequest, Student, StudentPerformanceResponse,
    SubmitQuizRequest, SubmitQuizResponse,
};
use crate::services::analysis_service::AnalysisService;
use crate::services::recommendation_service::{reconcile_resources, select_band};
use crate::services::scoring;
use crate::utils::retry::{retry_async_with_config, RetryConfig};

pub struct StudentService {
    mongo: Database,
}

impl StudentService {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    pub async fn register_student(&self, req: RegisterStudentRequest) -> Result<Student> {
        let students = self.mongo.collection::<Student>("students");

        let existing = students
            .find_one(doc! { "rollno": &req.rollno })
            .await
            .context("Failed to query student")?;
        if existing.is_some() {
            return Err(anyhow!("Student already registered"));
        }

        let now = Utc::now();
        let student = Student {
            id: None,
            rollno: req.rollno,
            name: req.name,
            email: req.email,
            quiz_attempts: vec![],
            performance: Default::default(),
            resources: vec![],
            created_at: now,
            updated_at: now,
        };

        let insert_result = track_db_operation("insert", "students", async {
            students
                .insert_one(&student)
                .await
                .context("Failed to insert student")
        })
        .await?;

        let student_id = insert_result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow!("Failed to get inserted student ID"))?;

        STUDENTS_REGISTERED_TOTAL
            .with_label_values(&["success"])
            .inc();

        students
            .find_one(doc! { "_id": student_id })
            .await
            .context("Failed to fetch created student")?
            .ok_or_else(|| anyhow!("Student not found after registration"))
    }

    pub async fn get_student(&self, rollno: &str) -> Result<Student> {
        let students = self.mongo.collection::<Student>("students");

        students
            .find_one(doc! { "rollno": rollno })
            .await
            .context("Failed to query student")?
            .ok_or_else(|| anyhow!("Student not found"))
    }

    /// Scores a submission and records all of its downstream state.
    ///
    /// The analysis aggregate and the recommendation reselection happen as
    /// direct in-process calls on the same request; any failure fails the
    /// whole submission instead of leaving a half-recorded attempt behind
    /// a logged-and-ignored error.
    pub async fn submit_quiz(
        &self,
        rollno: &str,
        req: SubmitQuizRequest,
    ) -> Result<SubmitQuizResponse> {
        let students = self.mongo.collection::<Student>("students");
        let quizzes = self.mongo.collection::<Quiz>("quizzes");

        let student = self.get_student(rollno).await?;

        let quiz_obj = ObjectId::parse_str(&req.quiz_id).context("Invalid quiz ID format")?;
        let quiz = quizzes
            .find_one(doc! { "_id": quiz_obj })
            .await
            .context("Failed to query quiz")?
            .ok_or_else(|| anyhow!("Quiz not found"))?;

        let questions = self.questions_for(quiz_obj).await?;

        let graded = scoring::grade_submission(&questions, &req.responses);
        let percentages = scoring::category_percentages(&quiz, &questions, &graded.responses);

        let mut performance = student.performance.clone();
        scoring::apply_thresholds(&mut performance, &percentages);

        let selected = select_band(&quiz.resources, graded.score);
        RECOMMENDATIONS_SELECTED_TOTAL
            .with_label_values(&[if selected.is_some() { "yes" } else { "no" }])
            .inc();
        let resources = reconcile_resources(student.resources.clone(), quiz_obj, selected);

        let attempt = QuizAttempt {
            quiz_id: quiz_obj,
            score: graded.score,
            time_taken: req.time_taken,
            responses: graded.responses.clone(),
            attempted_at: Utc::now(),
        };

        // Analysis aggregate first, so a student document is never ahead of
        // its analysis history.
        let analysis_service = AnalysisService::new(self.mongo.clone());
        analysis_service
            .record_submission(
                rollno,
                &req.quiz_id,
                graded.responses.clone(),
                graded.score,
                req.time_taken,
            )
            .await
            .context("Failed to record analysis for submission")?;

        let update_doc = doc! {
            "$push": { "quizAttempts": to_bson(&attempt)? },
            "$set": {
                "performance": to_bson(&performance)?,
                "resources": to_bson(&resources)?,
                "updatedAt": mongodb::bson::DateTime::now(),
            },
        };

        retry_async_with_config(RetryConfig::aggressive(), || async {
            students
                .update_one(doc! { "rollno": rollno }, update_doc.clone())
                .await
                .map(|_| ())
        })
        .await
        .context("Failed to record quiz attempt")?;

        QUIZ_SUBMISSIONS_TOTAL
            .with_label_values(&[quiz.category.as_str()])
            .inc();

        tracing::info!(
            "Quiz submitted: rollno={}, quiz={}, score={}",
            rollno,
            req.quiz_id,
            graded.score
        );

        Ok(SubmitQuizResponse {
            message: "Quiz submitted successfully".to_string(),
            score: graded.score,
            weak_areas: performance.weak_areas,
            strong_areas: performance.strong_areas,
        })
    }

    pub async fn get_performance(&self, rollno: &str) -> Result<StudentPerformanceResponse> {
        let student = self.get_student(rollno).await?;

        Ok(StudentPerformanceResponse {
            weak_areas: student.performance.weak_areas,
            strong_areas: student.performance.strong_areas,
            total_attempts: student.quiz_attempts.len(),
            last_attempt: student.quiz_attempts.last().cloned(),
        })
    }

    pub async fn get_quiz_history(&self, rollno: &str) -> Result<Vec<QuizHistoryEntry>> {
        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        let student = self.get_student(rollno).await?;

        let quiz_ids: Vec<ObjectId> = student.quiz_attempts.iter().map(|a| a.quiz_id).collect();
        let mut cursor = quizzes
            .find(doc! { "_id": { "$in": quiz_ids } })
            .await
            .context("Failed to query quizzes")?;
        let mut quiz_map: HashMap<ObjectId, Quiz> = HashMap::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            let quiz = cursor
                .deserialize_current()
                .context("Failed to deserialize quiz")?;
            if let Some(id) = quiz.id {
                quiz_map.insert(id, quiz);
            }
        }

        let history = student
            .quiz_attempts
            .into_iter()
            .map(|attempt| {
                let quiz = quiz_map.get(&attempt.quiz_id);
                QuizHistoryEntry {
                    quiz_id: attempt.quiz_id.to_hex(),
                    title: quiz
                        .map(|q| q.title.clone())
                        .unwrap_or_else(|| "Unknown Quiz".to_string()),
                    category: quiz
                        .map(|q| q.category.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    subcategory: quiz
                        .and_then(|q| q.subcategory.clone())
                        .unwrap_or_else(|| "N/A".to_string()),
                    score: attempt.score,
                    attempted_at: attempt.attempted_at,
                    time_taken: attempt.time_taken,
                    responses: attempt.responses,
                }
            })
            .collect();

        Ok(history)
    }

    async fn questions_for(&self, quiz_id: ObjectId) -> Result<Vec<Question>> {
        let questions = self.mongo.collection::<Question>("questions");

        let mut cursor = questions
            .find(doc! { "quizId": quiz_id })
            .await
            .context("Failed to query questions")?;

        let mut result = Vec::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            result.push(
                cursor
                    .deserialize_current()
                    .context("Failed to deserialize question")?,
            );
        }

        Ok(result)
    }
}
