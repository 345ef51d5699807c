use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Database;

use crate::models::analysis::{
    AdminSummaryResponse, AllAttemptsResponse, Analysis, AnalysisHistoryEntry, AttemptRow,
    CategoryBreakdown, CategoryStats, CategoryStatsResponse, MostAttemptedQuiz,
    QuizAnalysisResponse, QuizPerformanceResponse, QuizPerformanceRow, ScoreHistoryEntry,
    StudentAnalysisResponse, SubcategoryBreakdown, SubcategoryStats,
};
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use crate::models::student::{GradedResponse, Student};
use crate::models::Category;
use crate::services::scoring;
use crate::utils::retry::{retry_async_with_config, RetryConfig};

pub struct AnalysisService {
    mongo: Database,
}

impl AnalysisService {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    /// Records the analysis aggregate for one scored submission.
    ///
    /// Invoked in-process by the submission flow (the REST endpoint is a
    /// thin wrapper over the same path); a failure here fails the whole
    /// submission rather than being logged and swallowed.
    pub async fn record_submission(
        &self,
        rollno: &str,
        quiz_id: &str,
        responses: Vec<GradedResponse>,
        score: i32,
        time_taken: i64,
    ) -> Result<Analysis> {
        let students = self.mongo.collection::<Student>("students");
        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        let analyses = self.mongo.collection::<Analysis>("analyses");

        students
            .find_one(doc! { "rollno": rollno })
            .await
            .context("Failed to query student")?
            .ok_or_else(|| anyhow!("Student not found"))?;

        let quiz_obj = ObjectId::parse_str(quiz_id).context("Invalid quiz ID format")?;
        let quiz = quizzes
            .find_one(doc! { "_id": quiz_obj })
            .await
            .context("Failed to query quiz")?
            .ok_or_else(|| anyhow!("Quiz not found"))?;

        let questions = self.questions_for(quiz_obj).await?;
        let category_performance = scoring::category_percentages(&quiz, &questions, &responses);

        // Latest aggregate for this student-quiz pair carries the history.
        let previous = analyses
            .find_one(doc! { "rollno": rollno, "quizId": quiz_obj })
            .sort(doc! { "createdAt": -1 })
            .await
            .context("Failed to query previous analysis")?;

        let now = Utc::now();
        let mut previous_scores = previous
            .as_ref()
            .map(|p| p.previous_scores.clone())
            .unwrap_or_default();
        previous_scores.push(ScoreHistoryEntry {
            quiz_id: quiz_obj,
            score,
            attempted_at: now,
        });

        let average_score = previous_scores
            .iter()
            .map(|entry| f64::from(entry.score))
            .sum::<f64>()
            / previous_scores.len() as f64;
        let improvement_trend = previous.as_ref().map(|p| score - p.score).unwrap_or(0);

        let analysis = Analysis {
            id: None,
            rollno: rollno.to_string(),
            quiz_id: quiz_obj,
            responses,
            score,
            previous_scores,
            time_taken,
            average_score,
            improvement_trend,
            category_performance,
            created_at: now,
        };

        retry_async_with_config(RetryConfig::aggressive(), || async {
            analyses.insert_one(&analysis).await.map(|_| ())
        })
        .await
        .context("Failed to insert analysis")?;

        Ok(analysis)
    }

    /// Latest analysis for a student-quiz pair, populated with quiz details.
    pub async fn get_quiz_analysis(
        &self,
        rollno: &str,
        quiz_id: &str,
    ) -> Result<QuizAnalysisResponse> {
        let analyses = self.mongo.collection::<Analysis>("analyses");
        let quizzes = self.mongo.collection::<Quiz>("quizzes");

        let quiz_obj = ObjectId::parse_str(quiz_id).context("Invalid quiz ID format")?;
        let analysis = analyses
            .find_one(doc! { "rollno": rollno, "quizId": quiz_obj })
            .sort(doc! { "createdAt": -1 })
            .await
            .context("Failed to query analysis")?
            .ok_or_else(|| anyhow!("Analysis not found for this quiz"))?;

        let quiz = quizzes
            .find_one(doc! { "_id": quiz_obj })
            .await
            .context("Failed to query quiz")?
            .ok_or_else(|| anyhow!("Quiz not found"))?;

        Ok(QuizAnalysisResponse {
            quiz_title: quiz.title,
            category: quiz.category.to_string(),
            subcategory: quiz.subcategory,
            score: analysis.score,
            time_taken: analysis.time_taken,
            improvement_trend: analysis.improvement_trend,
            category_performance: analysis.category_performance,
            responses: analysis.responses,
        })
    }

    /// Per-student rollup across every stored analysis.
    pub async fn get_student_analysis(&self, rollno: &str) -> Result<StudentAnalysisResponse> {
        let records = self.analyses_for_student(rollno).await?;
        if records.is_empty() {
            return Err(anyhow!("No performance data found"));
        }

        let quiz_ids: Vec<ObjectId> = records.iter().map(|a| a.quiz_id).collect();
        let quiz_map = self.quiz_map(quiz_ids).await?;

        let quiz_history = records
            .iter()
            .map(|analysis| {
                let quiz = quiz_map.get(&analysis.quiz_id);
                AnalysisHistoryEntry {
                    quiz_title: quiz
                        .map(|q| q.title.clone())
                        .unwrap_or_else(|| "Unknown Quiz".to_string()),
                    category: quiz
                        .map(|q| q.category.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    subcategory: quiz.and_then(|q| q.subcategory.clone()),
                    score: analysis.score,
                    time_taken: analysis.time_taken,
                    attempted_at: analysis.created_at,
                }
            })
            .collect();

        Ok(StudentAnalysisResponse {
            rollno: rollno.to_string(),
            total_attempts: records.len(),
            average_score: mean_score(&records),
            category_performance: rollup_category_performance(&records),
            quiz_history,
        })
    }

    /// Admin dashboard headline numbers.
    pub async fn admin_summary(&self) -> Result<AdminSummaryResponse> {
        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        let total_quizzes = quizzes
            .count_documents(doc! {})
            .await
            .context("Failed to count quizzes")?;

        let records = self.all_analyses().await?;
        let total_attempts = records.len();
        let average_score = if total_attempts > 0 {
            round2(mean_score(&records))
        } else {
            0.0
        };

        let quiz_ids: Vec<ObjectId> = records.iter().map(|a| a.quiz_id).collect();
        let most_attempted_quiz = match most_attempted(&quiz_ids) {
            Some((quiz_id, attempts)) => {
                let quiz = quizzes
                    .find_one(doc! { "_id": quiz_id })
                    .await
                    .context("Failed to query most attempted quiz")?;
                quiz.map(|q| MostAttemptedQuiz {
                    title: q.title,
                    attempts,
                })
                .unwrap_or_default()
            }
            None => MostAttemptedQuiz::default(),
        };

        Ok(AdminSummaryResponse {
            total_quizzes,
            total_attempts,
            average_score,
            most_attempted_quiz,
        })
    }

    /// Every attempt of every student, flattened for the admin table view.
    pub async fn all_student_attempts(&self) -> Result<AllAttemptsResponse> {
        let students_coll = self.mongo.collection::<Student>("students");

        let mut cursor = students_coll
            .find(doc! {})
            .await
            .context("Failed to query students")?;
        let mut students = Vec::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            students.push(
                cursor
                    .deserialize_current()
                    .context("Failed to deserialize student")?,
            );
        }

        let quiz_ids: Vec<ObjectId> = students
            .iter()
            .flat_map(|s| s.quiz_attempts.iter().map(|a| a.quiz_id))
            .collect();
        let quiz_map = self.quiz_map(quiz_ids).await?;

        let mut attempts = Vec::new();
        for student in &students {
            for attempt in &student.quiz_attempts {
                let quiz = quiz_map.get(&attempt.quiz_id);
                attempts.push(AttemptRow {
                    rollno: student.rollno.clone(),
                    name: student.name.clone(),
                    quiz_id: attempt.quiz_id.to_hex(),
                    quiz_title: quiz
                        .map(|q| q.title.clone())
                        .unwrap_or_else(|| "Unknown Quiz".to_string()),
                    category: quiz
                        .map(|q| q.category.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    subcategory: quiz
                        .and_then(|q| q.subcategory.clone())
                        .unwrap_or_else(|| "N/A".to_string()),
                    score: attempt.score,
                    responses: attempt.responses.clone(),
                    time_taken: attempt.time_taken,
                    attempted_at: attempt.attempted_at,
                });
            }
        }

        Ok(AllAttemptsResponse {
            total_attempts: attempts.len(),
            attempts,
        })
    }

    /// Every student's performance on one quiz.
    pub async fn quiz_performance(&self, quiz_id: &str) -> Result<QuizPerformanceResponse> {
        let analyses = self.mongo.collection::<Analysis>("analyses");
        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        let students_coll = self.mongo.collection::<Student>("students");

        let quiz_obj = ObjectId::parse_str(quiz_id).context("Invalid quiz ID format")?;
        let mut cursor = analyses
            .find(doc! { "quizId": quiz_obj })
            .await
            .context("Failed to query analyses")?;
        let mut records = Vec::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            records.push(
                cursor
                    .deserialize_current()
                    .context("Failed to deserialize analysis")?,
            );
        }
        if records.is_empty() {
            return Err(anyhow!("No performance data found for this quiz"));
        }

        let quiz = quizzes
            .find_one(doc! { "_id": quiz_obj })
            .await
            .context("Failed to query quiz")?
            .ok_or_else(|| anyhow!("Quiz not found"))?;

        let rollnos: Vec<&str> = records.iter().map(|a| a.rollno.as_str()).collect();
        let mut cursor = students_coll
            .find(doc! { "rollno": { "$in": rollnos } })
            .await
            .context("Failed to query students")?;
        let mut names: HashMap<String, String> = HashMap::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            let student = cursor
                .deserialize_current()
                .context("Failed to deserialize student")?;
            names.insert(student.rollno, student.name);
        }

        let performance_data = records
            .into_iter()
            .map(|analysis| QuizPerformanceRow {
                name: names
                    .get(&analysis.rollno)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                rollno: analysis.rollno,
                score: analysis.score,
                time_taken: analysis.time_taken,
                category_performance: analysis.category_performance,
                attempted_at: analysis.created_at,
            })
            .collect::<Vec<_>>();

        Ok(QuizPerformanceResponse {
            quiz_title: quiz.title,
            category: quiz.category.to_string(),
            subcategory: quiz.subcategory,
            total_attempts: performance_data.len(),
            performance_data,
        })
    }

    /// Admin view over every category and subcategory, including the ones
    /// nobody has attempted yet.
    pub async fn category_stats(&self) -> Result<CategoryStatsResponse> {
        let quizzes_coll = self.mongo.collection::<Quiz>("quizzes");

        let mut cursor = quizzes_coll
            .find(doc! {})
            .await
            .context("Failed to query quizzes")?;
        let mut quizzes = Vec::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            quizzes.push(
                cursor
                    .deserialize_current()
                    .context("Failed to deserialize quiz")?,
            );
        }

        let records = self.all_analyses().await?;
        let quiz_map: HashMap<ObjectId, &Quiz> =
            quizzes.iter().filter_map(|q| q.id.map(|id| (id, q))).collect();

        let attempts: Vec<AttemptStat> = records
            .iter()
            .filter_map(|analysis| {
                quiz_map.get(&analysis.quiz_id).map(|quiz| AttemptStat {
                    category: quiz.category,
                    subcategory: quiz.subcategory.clone(),
                    score: analysis.score,
                    time_taken: analysis.time_taken,
                })
            })
            .collect();

        let total_quizzes = quizzes.len();
        let total_attempts = records.len();
        let quiz_completion_rate = if total_quizzes > 0 {
            round2(total_attempts as f64 / total_quizzes as f64 * 100.0)
        } else {
            0.0
        };

        Ok(CategoryStatsResponse {
            total_quizzes,
            total_attempts,
            quiz_completion_rate,
            category_stats: build_category_stats(&quizzes, &attempts),
        })
    }

    async fn analyses_for_student(&self, rollno: &str) -> Result<Vec<Analysis>> {
        let analyses = self.mongo.collection::<Analysis>("analyses");

        let mut cursor = analyses
            .find(doc! { "rollno": rollno })
            .await
            .context("Failed to query analyses")?;

        let mut records = Vec::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            records.push(
                cursor
                    .deserialize_current()
                    .context("Failed to deserialize analysis")?,
            );
        }

        Ok(records)
    }

    async fn all_analyses(&self) -> Result<Vec<Analysis>> {
        let analyses = self.mongo.collection::<Analysis>("analyses");

        let mut cursor = analyses
            .find(doc! {})
            .await
            .context("Failed to query analyses")?;

        let mut records = Vec::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            records.push(
                cursor
                    .deserialize_current()
                    .context("Failed to deserialize analysis")?,
            );
        }

        Ok(records)
    }

    async fn quiz_map(
        &self,
        ids: impl IntoIterator<Item = ObjectId>,
    ) -> Result<HashMap<ObjectId, Quiz>> {
        let quizzes = self.mongo.collection::<Quiz>("quizzes");
        let ids: Vec<ObjectId> = ids.into_iter().collect();

        let mut cursor = quizzes
            .find(doc! { "_id": { "$in": ids } })
            .await
            .context("Failed to query quizzes")?;

        let mut map = HashMap::new();
        while cursor.advance().await.context("Failed to advance cursor")? {
            let quiz = cursor
                .deserialize_current()
                .context("Failed to deserialize quiz")?;
            if let Some(id) = quiz.id {
                map.insert(id, quiz);
            }
        }

        Ok(map)
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

/// Flat arithmetic mean of raw scores. Not normalized by each quiz's mark
/// total; attempts at small and large quizzes weigh the same.
pub fn mean_score(records: &[Analysis]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|a| f64::from(a.score)).sum::<f64>() / records.len() as f64
}

/// Unweighted mean of attempt-level percentages per category key.
pub fn rollup_category_performance(records: &[Analysis]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, (f64, usize)> = HashMap::new();

    for analysis in records {
        for (key, &percentage) in &analysis.category_performance {
            let entry = totals.entry(key.clone()).or_insert((0.0, 0));
            entry.0 += percentage;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Linear tally of attempt counts per quiz; the first quiz (in scan order)
/// to reach the maximal count wins ties.
pub fn most_attempted(quiz_ids: &[ObjectId]) -> Option<(ObjectId, usize)> {
    let mut counts: HashMap<ObjectId, usize> = HashMap::new();
    for id in quiz_ids {
        *counts.entry(*id).or_insert(0) += 1;
    }

    let mut best: Option<(ObjectId, usize)> = None;
    for id in quiz_ids {
        let count = counts[id];
        match best {
            Some((_, best_count)) => {
                if count > best_count {
                    best = Some((*id, count));
                }
            }
            None => best = Some((*id, count)),
        }
    }

    best
}

/// One attempt joined with its quiz's category labels, the unit the
/// category-stats accumulation runs over.
#[derive(Debug, Clone)]
pub struct AttemptStat {
    pub category: Category,
    pub subcategory: Option<String>,
    pub score: i32,
    pub time_taken: i64,
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    score_sum: i64,
    highest: i32,
    lowest: i32,
    time_sum: i64,
}

impl Accumulator {
    fn record(&mut self, score: i32, time_taken: i64) {
        if self.count == 0 {
            self.lowest = score;
            self.highest = score;
        } else {
            self.lowest = self.lowest.min(score);
            self.highest = self.highest.max(score);
        }
        self.count += 1;
        self.score_sum += i64::from(score);
        self.time_sum += time_taken;
    }
}

/// Builds the admin category-stats tree.
///
/// Every category/subcategory present in `quizzes` is pre-seeded so
/// unattempted ones still render; categories with no quizzes at all get a
/// sentinel string instead of a stats object.
pub fn build_category_stats(
    quizzes: &[Quiz],
    attempts: &[AttemptStat],
) -> BTreeMap<String, CategoryBreakdown> {
    let mut category_acc: HashMap<Category, Accumulator> = HashMap::new();
    let mut sub_acc: HashMap<(Category, String), Accumulator> = HashMap::new();

    // Pre-seed from quizzes with zero-attempt placeholders.
    for quiz in quizzes {
        category_acc.entry(quiz.category).or_default();
        sub_acc
            .entry((quiz.category, subcategory_label(&quiz.subcategory)))
            .or_default();
    }

    for attempt in attempts {
        category_acc
            .entry(attempt.category)
            .or_default()
            .record(attempt.score, attempt.time_taken);
        sub_acc
            .entry((attempt.category, subcategory_label(&attempt.subcategory)))
            .or_default()
            .record(attempt.score, attempt.time_taken);
    }

    let mut stats = BTreeMap::new();
    for category in Category::ALL {
        let Some(acc) = category_acc.get(&category) else {
            stats.insert(category.to_string(), CategoryBreakdown::no_quizzes());
            continue;
        };

        let mut subcategories = BTreeMap::new();
        for ((cat, name), sub) in &sub_acc {
            if *cat != category {
                continue;
            }
            let breakdown = if sub.count == 0 {
                SubcategoryBreakdown::no_attempts()
            } else {
                SubcategoryBreakdown::Stats(SubcategoryStats {
                    total_attempts: sub.count,
                    average_score: round2(sub.score_sum as f64 / sub.count as f64),
                    highest_score: sub.highest,
                    lowest_score: sub.lowest,
                    average_time_taken: round2(sub.time_sum as f64 / sub.count as f64),
                })
            };
            subcategories.insert(name.clone(), breakdown);
        }

        let breakdown = if acc.count == 0 {
            CategoryStats {
                total_attempts: 0,
                subcategories,
                ..CategoryStats::default()
            }
        } else {
            CategoryStats {
                total_attempts: acc.count,
                average_score: Some(round2(acc.score_sum as f64 / acc.count as f64)),
                highest_score: Some(acc.highest),
                lowest_score: Some(acc.lowest),
                average_time_taken: Some(round2(acc.time_sum as f64 / acc.count as f64)),
                subcategories,
            }
        };
        stats.insert(category.to_string(), CategoryBreakdown::Stats(breakdown));
    }

    stats
}

fn subcategory_label(subcategory: &Option<String>) -> String {
    subcategory.clone().unwrap_or_else(|| "General".to_string())
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(quiz_id: ObjectId, score: i32, performance: &[(&str, f64)]) -> Analysis {
        Analysis {
            id: Some(ObjectId::new()),
            rollno: "21CS001".to_string(),
            quiz_id,
            responses: Vec::<GradedResponse>::new(),
            score,
            previous_scores: vec![],
            time_taken: 60,
            average_score: f64::from(score),
            improvement_trend: 0,
            category_performance: performance
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            created_at: Utc::now(),
        }
    }

    fn quiz(category: Category, subcategory: Option<&str>) -> Quiz {
        Quiz {
            id: Some(ObjectId::new()),
            title: "quiz".to_string(),
            category,
            subcategory: subcategory.map(str::to_string),
            time_limit: 10,
            resources: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rollup_averages_percentages_unweighted() {
        let quiz_id = ObjectId::new();
        let records = vec![
            analysis(quiz_id, 1, &[("Coding - Arrays", 50.0)]),
            analysis(quiz_id, 10, &[("Coding - Arrays", 100.0)]),
        ];

        let rollup = rollup_category_performance(&records);
        // 50 and 100 average to 75 even though the second quiz was bigger.
        assert_eq!(rollup["Coding - Arrays"], 75.0);
    }

    #[test]
    fn mean_score_is_flat_average_of_raw_scores() {
        let quiz_id = ObjectId::new();
        let records = vec![
            analysis(quiz_id, 2, &[]),
            analysis(quiz_id, 4, &[]),
            analysis(quiz_id, 9, &[]),
        ];
        assert_eq!(mean_score(&records), 5.0);
        assert_eq!(mean_score(&[]), 0.0);
    }

    #[test]
    fn most_attempted_counts_and_first_max_wins() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let ids = vec![a, b, b, a, b];
        assert_eq!(most_attempted(&ids), Some((b, 3)));

        // Ties resolve to the quiz seen first.
        let ids = vec![a, b, b, a];
        assert_eq!(most_attempted(&ids), Some((a, 2)));

        assert_eq!(most_attempted(&[]), None);
    }

    #[test]
    fn category_without_quizzes_yields_sentinel() {
        let quizzes = vec![quiz(Category::Coding, Some("Arrays"))];
        let stats = build_category_stats(&quizzes, &[]);

        assert_eq!(stats["Aptitude"], CategoryBreakdown::no_quizzes());
        assert_eq!(stats["Verbal"], CategoryBreakdown::no_quizzes());
        match &stats["Coding"] {
            CategoryBreakdown::Stats(coding) => {
                assert_eq!(coding.total_attempts, 0);
                assert_eq!(coding.average_score, None);
                assert_eq!(
                    coding.subcategories["Arrays"],
                    SubcategoryBreakdown::no_attempts()
                );
            }
            other => panic!("expected stats for Coding, got {:?}", other),
        }
    }

    #[test]
    fn attempted_category_accumulates_min_max_and_averages() {
        let coding = quiz(Category::Coding, Some("Arrays"));
        let attempts = vec![
            AttemptStat {
                category: Category::Coding,
                subcategory: Some("Arrays".to_string()),
                score: 4,
                time_taken: 100,
            },
            AttemptStat {
                category: Category::Coding,
                subcategory: Some("Arrays".to_string()),
                score: 9,
                time_taken: 200,
            },
        ];

        let stats = build_category_stats(&[coding], &attempts);
        match &stats["Coding"] {
            CategoryBreakdown::Stats(coding) => {
                assert_eq!(coding.total_attempts, 2);
                assert_eq!(coding.average_score, Some(6.5));
                assert_eq!(coding.highest_score, Some(9));
                assert_eq!(coding.lowest_score, Some(4));
                assert_eq!(coding.average_time_taken, Some(150.0));
                match &coding.subcategories["Arrays"] {
                    SubcategoryBreakdown::Stats(sub) => {
                        assert_eq!(sub.total_attempts, 2);
                        assert_eq!(sub.lowest_score, 4);
                    }
                    other => panic!("expected stats for Arrays, got {:?}", other),
                }
            }
            other => panic!("expected stats for Coding, got {:?}", other),
        }
    }

    #[test]
    fn missing_subcategory_accumulates_under_general() {
        let aptitude = quiz(Category::Aptitude, None);
        let attempts = vec![AttemptStat {
            category: Category::Aptitude,
            subcategory: None,
            score: 3,
            time_taken: 30,
        }];

        let stats = build_category_stats(&[aptitude], &attempts);
        match &stats["Aptitude"] {
            CategoryBreakdown::Stats(stats) => {
                assert!(stats.subcategories.contains_key("General"));
            }
            other => panic!("expected stats for Aptitude, got {:?}", other),
        }
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.0), 0.0);
    }
}
