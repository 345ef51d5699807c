use crate::models::question::Question;
use crate::models::quiz::{
    CreateQuizRequest, Quiz, QuizQuestionsResponse, QuizWithQuestionsResponse, UpdateQuizRequest,
};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::Database;

pub struct QuizService {
    mongo: Database,
}

impl QuizService {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    pub async fn create_quiz(&self, req: CreateQuizRequest) -> Result<Quiz> {
        let quizzes = self.mongo.collection::<Quiz>("quizzes");

        let quiz = Quiz {
            id: None,
            title: req.title,
            category: req.category,
            subcategory: req.subcategory,
            time_limit: req.time_limit,
            resources: req.resources,
            created_at: Utc::now(),
        };

        let insert_result = quizzes
            .insert_one(&quiz)
            .await
            .context("Failed to insert quiz")?;

        let quiz_id = insert_result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow!("Failed to get inserted quiz ID"))?;

        quizzes
            .find_one(doc! { "_id": quiz_id })
            .await
            .context("Failed to fetch created quiz")?
            .ok_or_else(|| anyhow!("Quiz not found after creation"))
    }

    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        let quizzes = self.mongo.collection::<Quiz>("quizzes");

        let mut cursor = quizzes
            .find(doc! {})
            .await
            .context("Failed to query quizzes")?;

        let mut result = Vec::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            result.push(
                cursor
                    .deserialize_current()
                    .context("Failed to deserialize quiz")?,
            );
        }

        Ok(result)
    }

    pub async fn get_quiz(&self, quiz_id: &str) -> Result<Quiz> {
        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        let object_id = ObjectId::parse_str(quiz_id).context("Invalid quiz ID format")?;

        quizzes
            .find_one(doc! { "_id": object_id })
            .await
            .context("Failed to query quiz")?
            .ok_or_else(|| anyhow!("Quiz not found"))
    }

    pub async fn update_quiz(&self, quiz_id: &str, req: UpdateQuizRequest) -> Result<Quiz> {
        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        let object_id = ObjectId::parse_str(quiz_id).context("Invalid quiz ID format")?;

        let mut update_doc = doc! { "$set": {} };

        if let Some(title) = req.title {
            update_doc.get_document_mut("$set")?.insert("title", title);
        }
        if let Some(category) = req.category {
            update_doc
                .get_document_mut("$set")?
                .insert("category", category.as_str());
        }
        if let Some(subcategory) = req.subcategory {
            update_doc
                .get_document_mut("$set")?
                .insert("subcategory", subcategory);
        }
        if let Some(time_limit) = req.time_limit {
            update_doc
                .get_document_mut("$set")?
                .insert("timeLimit", time_limit);
        }
        if let Some(resources) = req.resources {
            update_doc
                .get_document_mut("$set")?
                .insert("resources", to_bson(&resources)?);
        }

        // update_one rejects an empty $set; a body with no fields is a no-op.
        if !update_doc.get_document("$set")?.is_empty() {
            let result = quizzes
                .update_one(doc! { "_id": object_id }, update_doc)
                .await
                .context("Failed to update quiz")?;

            if result.matched_count == 0 {
                return Err(anyhow!("Quiz not found"));
            }
        }

        quizzes
            .find_one(doc! { "_id": object_id })
            .await
            .context("Failed to fetch updated quiz")?
            .ok_or_else(|| anyhow!("Quiz not found after update"))
    }

    /// Deletes a quiz and cascades to every question that references it.
    /// The questions go first so a failure cannot orphan them behind a
    /// deleted quiz.
    pub async fn delete_quiz(&self, quiz_id: &str) -> Result<()> {
        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        let questions = self.mongo.collection::<Question>("questions");
        let object_id = ObjectId::parse_str(quiz_id).context("Invalid quiz ID format")?;

        let quiz = quizzes
            .find_one(doc! { "_id": object_id })
            .await
            .context("Failed to query quiz")?;
        if quiz.is_none() {
            return Err(anyhow!("Quiz not found"));
        }

        let removed = questions
            .delete_many(doc! { "quizId": object_id })
            .await
            .context("Failed to cascade-delete questions")?;
        tracing::info!(
            "Cascade-deleted {} questions for quiz {}",
            removed.deleted_count,
            quiz_id
        );

        quizzes
            .delete_one(doc! { "_id": object_id })
            .await
            .context("Failed to delete quiz")?;

        Ok(())
    }

    pub async fn get_quiz_with_questions(&self, quiz_id: &str) -> Result<QuizWithQuestionsResponse> {
        let quiz = self.get_quiz(quiz_id).await?;
        let object_id = quiz.id.ok_or_else(|| anyhow!("Quiz is missing an ID"))?;
        let questions = self.questions_for(object_id).await?;

        Ok(QuizWithQuestionsResponse { quiz, questions })
    }

    /// Quiz details plus its questions and the mark total the scoring
    /// engine grades against. An empty question list is a valid state.
    pub async fn get_questions_for_quiz(&self, quiz_id: &str) -> Result<QuizQuestionsResponse> {
        let quiz = self.get_quiz(quiz_id).await?;
        let object_id = quiz.id.ok_or_else(|| anyhow!("Quiz is missing an ID"))?;
        let questions = self.questions_for(object_id).await?;
        let total_marks = questions.iter().map(|q| q.marks).sum();
        let time_limit = quiz.time_limit;

        Ok(QuizQuestionsResponse {
            quiz_details: quiz,
            questions,
            total_marks,
            time_limit,
        })
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
