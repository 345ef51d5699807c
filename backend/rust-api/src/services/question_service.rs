use crate::models::question::{
    BulkCreateQuestionsRequest, CreateQuestionRequest, Question, UpdateQuestionRequest,
};
use crate::models::quiz::Quiz;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Database;

pub struct QuestionService {
    mongo: Database,
}

impl QuestionService {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    pub async fn create_question(&self, req: CreateQuestionRequest) -> Result<Question> {
        let question = self.build_question(req).await?;
        let questions = self.mongo.collection::<Question>("questions");

        let insert_result = questions
            .insert_one(&question)
            .await
            .context("Failed to insert question")?;

        let question_id = insert_result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow!("Failed to get inserted question ID"))?;

        questions
            .find_one(doc! { "_id": question_id })
            .await
            .context("Failed to fetch created question")?
            .ok_or_else(|| anyhow!("Question not found after creation"))
    }

    /// Bulk insert; insert_many is all-or-nothing at the driver level, so
    /// every question is resolved and validated before the first write.
    pub async fn create_questions_bulk(
        &self,
        req: BulkCreateQuestionsRequest,
    ) -> Result<Vec<Question>> {
        let mut batch = Vec::with_capacity(req.questions.len());
        for question_req in req.questions {
            batch.push(self.build_question(question_req).await?);
        }

        let questions = self.mongo.collection::<Question>("questions");
        questions
            .insert_many(&batch)
            .await
            .context("Failed to bulk-insert questions")?;

        Ok(batch)
    }

    pub async fn get_question(&self, question_id: &str) -> Result<Question> {
        let questions = self.mongo.collection::<Question>("questions");
        let object_id = ObjectId::parse_str(question_id).context("Invalid question ID format")?;

        questions
            .find_one(doc! { "_id": object_id })
            .await
            .context("Failed to query question")?
            .ok_or_else(|| anyhow!("Question not found"))
    }

    pub async fn list_questions_by_quiz(&self, quiz_id: &str) -> Result<Vec<Question>> {
        let questions = self.mongo.collection::<Question>("questions");
        let object_id = ObjectId::parse_str(quiz_id).context("Invalid quiz ID format")?;

        let mut cursor = questions
            .find(doc! { "quizId": object_id })
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

    pub async fn update_question(
        &self,
        question_id: &str,
        req: UpdateQuestionRequest,
    ) -> Result<Question> {
        let questions = self.mongo.collection::<Question>("questions");
        let object_id = ObjectId::parse_str(question_id).context("Invalid question ID format")?;

        let existing = questions
            .find_one(doc! { "_id": object_id })
            .await
            .context("Failed to query question")?
            .ok_or_else(|| anyhow!("Question not found"))?;

        // The correct-option invariant has to hold against the options the
        // question ends up with, not the ones it had.
        let options = req.options.unwrap_or(existing.options);
        let correct_option = req.correct_option.unwrap_or(existing.correct_option);
        if correct_option < 0 || correct_option as usize >= options.len() {
            return Err(anyhow!("correctOption must index into options"));
        }

        let mut update_doc = doc! {
            "$set": {
                "options": options.clone(),
                "correctOption": correct_option,
            }
        };
        if let Some(text) = req.question_text {
            update_doc
                .get_document_mut("$set")?
                .insert("questionText", text);
        }
        if let Some(explanation) = req.explanation {
            update_doc
                .get_document_mut("$set")?
                .insert("explanation", explanation);
        }
        if let Some(marks) = req.marks {
            update_doc.get_document_mut("$set")?.insert("marks", marks);
        }

        questions
            .update_one(doc! { "_id": object_id }, update_doc)
            .await
            .context("Failed to update question")?;

        questions
            .find_one(doc! { "_id": object_id })
            .await
            .context("Failed to fetch updated question")?
            .ok_or_else(|| anyhow!("Question not found after update"))
    }

    pub async fn delete_question(&self, question_id: &str) -> Result<()> {
        let questions = self.mongo.collection::<Question>("questions");
        let object_id = ObjectId::parse_str(question_id).context("Invalid question ID format")?;

        let result = questions
            .delete_one(doc! { "_id": object_id })
            .await
            .context("Failed to delete question")?;

        if result.deleted_count == 0 {
            return Err(anyhow!("Question not found"));
        }

        Ok(())
    }

    pub async fn delete_questions_by_quiz(&self, quiz_id: &str) -> Result<u64> {
        let questions = self.mongo.collection::<Question>("questions");
        let object_id = ObjectId::parse_str(quiz_id).context("Invalid quiz ID format")?;

        let result = questions
            .delete_many(doc! { "quizId": object_id })
            .await
            .context("Failed to delete questions for quiz")?;

        Ok(result.deleted_count)
    }

    /// Resolves the owning quiz and materializes the defaults.
    async fn build_question(&self, req: CreateQuestionRequest) -> Result<Question> {
        let quiz_id = ObjectId::parse_str(&req.quiz_id).context("Invalid quiz ID format")?;

        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        quizzes
            .find_one(doc! { "_id": quiz_id })
            .await
            .context("Failed to query quiz")?
            .ok_or_else(|| anyhow!("Quiz not found"))?;

        Ok(Question {
            id: Some(ObjectId::new()),
            quiz_id,
            question_text: req.question_text,
            options: req.options,
            correct_option: req.correct_option,
            explanation: req.explanation.unwrap_or_default(),
            marks: req.marks.unwrap_or(1),
            created_at: Utc::now(),
        })
    }
}
