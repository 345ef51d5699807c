//! Pure scoring pipeline: grading submitted responses against a quiz's
//! questions, rolling marks up into category percentages, and merging the
//! result into a student's weak/strong area maps.
//!
//! Everything here is side-effect free; `StudentService` orchestrates the
//! database reads and writes around it.

use std::collections::HashMap;

use crate::models::{
    question::Question,
    quiz::Quiz,
    student::{GradedResponse, Performance, ResponseInput},
};

/// Below this percentage a category key is classified weak.
pub const WEAK_THRESHOLD: f64 = 40.0;
/// Above this percentage a category key is classified strong.
pub const STRONG_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone)]
pub struct GradedSubmission {
    /// Sum of marks for correct responses; 0 <= score <= total marks.
    pub score: i32,
    pub responses: Vec<GradedResponse>,
}

/// Grades a submission. A response whose questionId matches no question of
/// the quiz is dropped: it contributes to neither score nor percentages.
pub fn grade_submission(questions: &[Question], responses: &[ResponseInput]) -> GradedSubmission {
    let mut score = 0;
    let mut graded = Vec::with_capacity(responses.len());

    for response in responses {
        let Some((question, question_id)) = questions.iter().find_map(|q| {
            q.id.filter(|id| id.to_hex() == response.question_id)
                .map(|id| (q, id))
        }) else {
            continue;
        };

        let is_correct = question.correct_option == response.selected_option;
        if is_correct {
            score += question.marks;
        }

        graded.push(GradedResponse {
            question_id,
            selected_option: response.selected_option,
            is_correct,
        });
    }

    GradedSubmission {
        score,
        responses: graded,
    }
}

/// Rolls marks up into "category - subcategory" percentages.
///
/// The denominator is the quiz's full mark total, so unanswered questions
/// lower the percentage even though they never affect the raw score.
pub fn category_percentages(
    quiz: &Quiz,
    questions: &[Question],
    graded: &[GradedResponse],
) -> HashMap<String, f64> {
    let key = quiz.category_key();
    let mut totals: HashMap<String, (i32, i32)> = HashMap::new();

    for question in questions {
        let entry = totals.entry(key.clone()).or_insert((0, 0));
        entry.1 += question.marks;

        let answered_correctly = graded
            .iter()
            .any(|r| Some(r.question_id) == question.id && r.is_correct);
        if answered_correctly {
            entry.0 += question.marks;
        }
    }

    totals
        .into_iter()
        .filter(|&(_, (_, total))| total > 0)
        .map(|(key, (correct, total))| (key, f64::from(correct) / f64::from(total) * 100.0))
        .collect()
}

/// Merges freshly computed percentages into the weak/strong maps.
///
/// p < 40 marks the key weak and clears any strong entry; p > 80 marks it
/// strong and clears any weak entry; percentages in between leave the prior
/// classification untouched. Last write wins per key.
pub fn apply_thresholds(performance: &mut Performance, percentages: &HashMap<String, f64>) {
    for (key, &percentage) in percentages {
        if percentage < WEAK_THRESHOLD {
            performance.weak_areas.insert(key.clone(), percentage);
            performance.strong_areas.remove(key);
        } else if percentage > STRONG_THRESHOLD {
            performance.strong_areas.insert(key.clone(), percentage);
            performance.weak_areas.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;
    use mongodb::bson::oid::ObjectId;

    fn quiz(category: Category, subcategory: Option<&str>) -> Quiz {
        Quiz {
            id: Some(ObjectId::new()),
            title: "Test quiz".to_string(),
            category,
            subcategory: subcategory.map(str::to_string),
            time_limit: 30,
            resources: vec![],
            created_at: Utc::now(),
        }
    }

    fn question(quiz_id: ObjectId, correct: i32, marks: i32) -> Question {
        Question {
            id: Some(ObjectId::new()),
            quiz_id,
            question_text: "q".to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_option: correct,
            explanation: String::new(),
            marks,
            created_at: Utc::now(),
        }
    }

    fn answer(question: &Question, selected: i32) -> ResponseInput {
        ResponseInput {
            question_id: question.id.unwrap().to_hex(),
            selected_option: selected,
        }
    }

    #[test]
    fn all_correct_answers_score_full_marks() {
        let quiz = quiz(Category::Coding, Some("Arrays"));
        let q1 = question(quiz.id.unwrap(), 0, 1);
        let q2 = question(quiz.id.unwrap(), 1, 1);
        let questions = vec![q1.clone(), q2.clone()];

        let graded = grade_submission(&questions, &[answer(&q1, 0), answer(&q2, 1)]);
        assert_eq!(graded.score, 2);
        assert!(graded.responses.iter().all(|r| r.is_correct));
    }

    #[test]
    fn one_wrong_answer_scores_partial_marks() {
        let quiz = quiz(Category::Coding, Some("Arrays"));
        let q1 = question(quiz.id.unwrap(), 0, 1);
        let q2 = question(quiz.id.unwrap(), 1, 1);
        let questions = vec![q1.clone(), q2.clone()];

        let graded = grade_submission(&questions, &[answer(&q1, 1), answer(&q2, 1)]);
        assert_eq!(graded.score, 1);
        assert!(!graded.responses[0].is_correct);
        assert!(graded.responses[1].is_correct);
    }

    #[test]
    fn unknown_question_ids_are_dropped_silently() {
        let quiz = quiz(Category::Aptitude, None);
        let q1 = question(quiz.id.unwrap(), 2, 5);
        let questions = vec![q1.clone()];

        let stray = ResponseInput {
            question_id: ObjectId::new().to_hex(),
            selected_option: 2,
        };
        let graded = grade_submission(&questions, &[stray, answer(&q1, 2)]);

        assert_eq!(graded.score, 5);
        assert_eq!(graded.responses.len(), 1);
    }

    #[test]
    fn regrading_the_same_submission_scores_identically() {
        let quiz = quiz(Category::Coding, Some("Arrays"));
        let q1 = question(quiz.id.unwrap(), 0, 1);
        let q2 = question(quiz.id.unwrap(), 1, 1);
        let questions = vec![q1.clone(), q2.clone()];
        let answers = [answer(&q1, 0), answer(&q2, 2)];

        let first = grade_submission(&questions, &answers);
        let second = grade_submission(&questions, &answers);
        assert_eq!(first.score, second.score);
        assert_eq!(first.responses.len(), second.responses.len());
    }

    #[test]
    fn score_never_exceeds_total_marks() {
        let quiz = quiz(Category::Verbal, None);
        let q1 = question(quiz.id.unwrap(), 0, 3);
        let q2 = question(quiz.id.unwrap(), 1, 2);
        let questions = vec![q1.clone(), q2.clone()];
        let total: i32 = questions.iter().map(|q| q.marks).sum();

        let graded = grade_submission(&questions, &[answer(&q1, 0), answer(&q2, 1)]);
        assert!(graded.score >= 0 && graded.score <= total);
        assert_eq!(graded.score, total);
    }

    #[test]
    fn unanswered_questions_lower_the_percentage_but_not_the_score() {
        let quiz = quiz(Category::Coding, Some("Arrays"));
        let q1 = question(quiz.id.unwrap(), 0, 1);
        let q2 = question(quiz.id.unwrap(), 0, 1);
        let questions = vec![q1.clone(), q2.clone()];

        // Only one of two questions answered, correctly.
        let graded = grade_submission(&questions, &[answer(&q1, 0)]);
        assert_eq!(graded.score, 1);

        let percentages = category_percentages(&quiz, &questions, &graded.responses);
        assert_eq!(percentages["Coding - Arrays"], 50.0);
    }

    #[test]
    fn perfect_score_marks_category_strong() {
        let quiz = quiz(Category::Coding, Some("Arrays"));
        let q1 = question(quiz.id.unwrap(), 0, 1);
        let questions = vec![q1.clone()];

        let graded = grade_submission(&questions, &[answer(&q1, 0)]);
        let percentages = category_percentages(&quiz, &questions, &graded.responses);

        let mut performance = Performance::default();
        apply_thresholds(&mut performance, &percentages);

        assert!(performance.weak_areas.is_empty());
        assert_eq!(performance.strong_areas["Coding - Arrays"], 100.0);
    }

    #[test]
    fn weak_classification_removes_existing_strong_entry() {
        let mut performance = Performance::default();
        performance
            .strong_areas
            .insert("Coding - Arrays".to_string(), 90.0);

        let mut percentages = HashMap::new();
        percentages.insert("Coding - Arrays".to_string(), 25.0);
        apply_thresholds(&mut performance, &percentages);

        assert_eq!(performance.weak_areas["Coding - Arrays"], 25.0);
        assert!(!performance.strong_areas.contains_key("Coding - Arrays"));
    }

    #[test]
    fn strong_classification_removes_existing_weak_entry() {
        let mut performance = Performance::default();
        performance
            .weak_areas
            .insert("Aptitude - Aptitude".to_string(), 30.0);

        let mut percentages = HashMap::new();
        percentages.insert("Aptitude - Aptitude".to_string(), 85.0);
        apply_thresholds(&mut performance, &percentages);

        assert_eq!(performance.strong_areas["Aptitude - Aptitude"], 85.0);
        assert!(!performance.weak_areas.contains_key("Aptitude - Aptitude"));
    }

    #[test]
    fn middle_band_leaves_prior_classification_untouched() {
        let mut performance = Performance::default();
        performance
            .weak_areas
            .insert("Verbal - Verbal".to_string(), 20.0);

        let mut percentages = HashMap::new();
        percentages.insert("Verbal - Verbal".to_string(), 60.0);
        apply_thresholds(&mut performance, &percentages);

        // 40 <= p <= 80: neither map changes.
        assert_eq!(performance.weak_areas["Verbal - Verbal"], 20.0);
        assert!(performance.strong_areas.is_empty());
    }

    #[test]
    fn threshold_boundaries_are_exclusive() {
        let mut performance = Performance::default();
        let mut percentages = HashMap::new();
        percentages.insert("a".to_string(), WEAK_THRESHOLD);
        percentages.insert("b".to_string(), STRONG_THRESHOLD);
        apply_thresholds(&mut performance, &percentages);

        assert!(performance.weak_areas.is_empty());
        assert!(performance.strong_areas.is_empty());
    }
}
