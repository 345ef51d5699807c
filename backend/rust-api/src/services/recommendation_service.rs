use anyhow::{anyhow, Context, Result};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Database;
use uuid::Uuid;

use crate::models::quiz::{Quiz, ScoreBandResource};
use crate::models::student::{PersonalizedResource, RecommendationEntry, Student};
use std::collections::HashMap;

pub struct RecommendationService {
    mongo: Database,
}

/// Picks the band matching a score. Bands may overlap; declaration order is
/// precedence and the first match wins.
pub fn select_band(bands: &[ScoreBandResource], score: i32) -> Option<&ScoreBandResource> {
    bands
        .iter()
        .find(|band| band.min_score <= score && score <= band.max_score)
}

/// Re-derives the personalized resource list after a scored submission.
///
/// At most one live entry per quiz: any previous entry for `quiz_id` is
/// purged. When the replacement points at the same resourceLink, the prior
/// entry's id and completion flag survive the reselection, so re-submitting
/// the same score is idempotent for the student's progress.
pub fn reconcile_resources(
    resources: Vec<PersonalizedResource>,
    quiz_id: ObjectId,
    selected: Option<&ScoreBandResource>,
) -> Vec<PersonalizedResource> {
    let (previous, mut kept): (Vec<_>, Vec<_>) = resources
        .into_iter()
        .partition(|resource| resource.quiz_id == quiz_id);

    if let Some(band) = selected {
        let carried_over = previous
            .iter()
            .find(|resource| resource.resource_link == band.resource_link);

        kept.push(PersonalizedResource {
            resource_id: carried_over
                .map(|r| r.resource_id.clone())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            quiz_id,
            recommendation: band.recommendation.clone(),
            resource_link: band.resource_link.clone(),
            is_completed: carried_over.map(|r| r.is_completed).unwrap_or(false),
        });
    }

    kept
}

impl RecommendationService {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    /// Personalized resources joined with quiz details and the student's
    /// latest score on each quiz.
    pub async fn list_recommendations(&self, rollno: &str) -> Result<Vec<RecommendationEntry>> {
        let students = self.mongo.collection::<Student>("students");
        let quizzes = self.mongo.collection::<Quiz>("quizzes");

        let student = students
            .find_one(doc! { "rollno": rollno })
            .await
            .context("Failed to query student")?
            .ok_or_else(|| anyhow!("Student not found"))?;

        let quiz_ids: Vec<ObjectId> = student.resources.iter().map(|r| r.quiz_id).collect();
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

        let entries = student
            .resources
            .iter()
            .map(|resource| {
                let quiz = quiz_map.get(&resource.quiz_id);
                let latest_score = student
                    .quiz_attempts
                    .iter()
                    .rev()
                    .find(|attempt| attempt.quiz_id == resource.quiz_id)
                    .map(|attempt| attempt.score)
                    .unwrap_or(0);

                RecommendationEntry {
                    resource_id: resource.resource_id.clone(),
                    quiz_title: quiz
                        .map(|q| q.title.clone())
                        .unwrap_or_else(|| "Unknown Quiz".to_string()),
                    category: quiz
                        .map(|q| q.category.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    subcategory: quiz
                        .and_then(|q| q.subcategory.clone())
                        .unwrap_or_else(|| "N/A".to_string()),
                    score: latest_score,
                    recommendation: resource.recommendation.clone(),
                    resource_link: resource.resource_link.clone(),
                    is_completed: resource.is_completed,
                }
            })
            .collect();

        Ok(entries)
    }

    /// Point update of one resource's completion flag.
    pub async fn set_completion(
        &self,
        rollno: &str,
        resource_id: &str,
        is_completed: bool,
    ) -> Result<PersonalizedResource> {
        let students = self.mongo.collection::<Student>("students");

        let student = students
            .find_one(doc! { "rollno": rollno })
            .await
            .context("Failed to query student")?
            .ok_or_else(|| anyhow!("Student not found"))?;

        if !student
            .resources
            .iter()
            .any(|r| r.resource_id == resource_id)
        {
            return Err(anyhow!("Resource not found"));
        }

        students
            .update_one(
                doc! { "rollno": rollno, "resources.resourceId": resource_id },
                doc! { "$set": { "resources.$.isCompleted": is_completed } },
            )
            .await
            .context("Failed to update resource completion")?;

        let updated = students
            .find_one(doc! { "rollno": rollno })
            .await
            .context("Failed to fetch updated student")?
            .ok_or_else(|| anyhow!("Student not found after update"))?;

        updated
            .resources
            .into_iter()
            .find(|r| r.resource_id == resource_id)
            .ok_or_else(|| anyhow!("Resource not found after update"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(min: i32, max: i32, link: &str) -> ScoreBandResource {
        ScoreBandResource {
            min_score: min,
            max_score: max,
            recommendation: format!("study {}", link),
            resource_link: link.to_string(),
        }
    }

    fn resource(quiz_id: ObjectId, link: &str, completed: bool) -> PersonalizedResource {
        PersonalizedResource {
            resource_id: Uuid::new_v4().to_string(),
            quiz_id,
            recommendation: "old".to_string(),
            resource_link: link.to_string(),
            is_completed: completed,
        }
    }

    #[test]
    fn first_matching_band_wins_on_overlap() {
        let bands = vec![band(0, 10, "a"), band(5, 15, "b")];
        assert_eq!(select_band(&bands, 7).unwrap().resource_link, "a");
        assert_eq!(select_band(&bands, 12).unwrap().resource_link, "b");
        assert!(select_band(&bands, 20).is_none());
    }

    #[test]
    fn band_bounds_are_inclusive() {
        let bands = vec![band(3, 5, "a")];
        assert!(select_band(&bands, 3).is_some());
        assert!(select_band(&bands, 5).is_some());
        assert!(select_band(&bands, 2).is_none());
        assert!(select_band(&bands, 6).is_none());
    }

    #[test]
    fn reselection_purges_previous_entry_for_quiz() {
        let quiz_id = ObjectId::new();
        let other_quiz = ObjectId::new();
        let resources = vec![
            resource(quiz_id, "old-link", true),
            resource(other_quiz, "unrelated", false),
        ];

        let new_band = band(0, 10, "new-link");
        let updated = reconcile_resources(resources, quiz_id, Some(&new_band));

        assert_eq!(updated.len(), 2);
        let for_quiz: Vec<_> = updated.iter().filter(|r| r.quiz_id == quiz_id).collect();
        assert_eq!(for_quiz.len(), 1);
        assert_eq!(for_quiz[0].resource_link, "new-link");
        assert!(!for_quiz[0].is_completed);
    }

    #[test]
    fn same_link_preserves_id_and_completion() {
        let quiz_id = ObjectId::new();
        let existing = resource(quiz_id, "same-link", true);
        let existing_id = existing.resource_id.clone();

        let new_band = band(0, 10, "same-link");
        let updated = reconcile_resources(vec![existing], quiz_id, Some(&new_band));

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].resource_id, existing_id);
        assert!(updated[0].is_completed);
        assert_eq!(updated[0].recommendation, "study same-link");
    }

    #[test]
    fn no_matching_band_still_purges_previous_entry() {
        let quiz_id = ObjectId::new();
        let resources = vec![resource(quiz_id, "old-link", false)];

        let updated = reconcile_resources(resources, quiz_id, None);
        assert!(updated.is_empty());
    }
}
