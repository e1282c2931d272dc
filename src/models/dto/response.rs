use serde::Serialize;

use chrono::{DateTime, Utc};

use crate::models::domain::question::{Question, QuestionKind};
use crate::models::domain::quiz::Quiz;
use crate::models::domain::submission::Submission;

#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, offset: i64, limit: i64) -> Self {
        Self {
            items,
            total,
            offset,
            limit,
        }
    }
}

/// What a student sees while taking a quiz: prompts and option texts,
/// never `is_correct` flags or sample answers.
#[derive(Debug, Serialize)]
pub struct QuizTakingView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_to: Option<DateTime<Utc>>,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
    pub order_index: u32,
    pub points: u32,
    pub question_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        let (question_type, options) = match &question.kind {
            QuestionKind::MultipleChoice { options } => (
                "multiple_choice",
                Some(options.iter().map(|opt| opt.text.clone()).collect()),
            ),
            QuestionKind::Written { .. } => ("written", None),
        };

        QuestionView {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
            order_index: question.order_index,
            points: question.points,
            question_type,
            options,
        }
    }
}

impl From<&Quiz> for QuizTakingView {
    fn from(quiz: &Quiz) -> Self {
        QuizTakingView {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            time_limit_minutes: quiz.time_limit_minutes,
            available_to: quiz.available_to,
            questions: quiz
                .questions_in_order()
                .into_iter()
                .map(QuestionView::from)
                .collect(),
        }
    }
}

/// Post-grading review for the student: their graded submission plus
/// the multiple-choice answer key. Only served when the quiz allows
/// review.
#[derive(Debug, Serialize)]
pub struct AttemptReview {
    pub submission: Submission,
    pub answer_key: Vec<AnswerKeyEntry>,
}

#[derive(Debug, Serialize)]
pub struct AnswerKeyEntry {
    pub question_id: String,
    pub correct_options: Vec<u32>,
}

impl AttemptReview {
    pub fn new(submission: Submission, quiz: &Quiz) -> Self {
        let answer_key = quiz
            .questions_in_order()
            .into_iter()
            .filter_map(|q| {
                q.correct_option_indexes().map(|correct| AnswerKeyEntry {
                    question_id: q.id.clone(),
                    correct_options: correct,
                })
            })
            .collect();

        AttemptReview {
            submission,
            answer_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::QuestionOption;

    fn quiz_with_answer_key() -> Quiz {
        let mut quiz = Quiz::new_draft("Geography", "class-1", "teacher-1");
        quiz.questions.push(Question::new(
            "Capital of France?",
            QuestionKind::MultipleChoice {
                options: vec![
                    QuestionOption {
                        text: "Paris".to_string(),
                        is_correct: true,
                    },
                    QuestionOption {
                        text: "Lyon".to_string(),
                        is_correct: false,
                    },
                ],
            },
            1,
            2,
        ));
        quiz.questions.push(Question::new(
            "Describe a fjord",
            QuestionKind::Written { sample_answer: Some("steep-sided inlet".to_string()) },
            2,
            3,
        ));
        quiz
    }

    #[test]
    fn taking_view_strips_answer_key_and_sample_answers() {
        let quiz = quiz_with_answer_key();
        let view = QuizTakingView::from(&quiz);

        assert_eq!(view.questions.len(), 2);
        assert_eq!(view.questions[0].question_type, "multiple_choice");
        assert_eq!(
            view.questions[0].options,
            Some(vec!["Paris".to_string(), "Lyon".to_string()])
        );
        assert_eq!(view.questions[1].question_type, "written");
        assert_eq!(view.questions[1].options, None);

        let json = serde_json::to_string(&view).expect("view should serialize");
        assert!(!json.contains("is_correct"));
        assert!(!json.contains("sample_answer"));
    }

    #[test]
    fn review_exposes_multiple_choice_key_only() {
        let quiz = quiz_with_answer_key();
        let submission = Submission::new_for_quiz(&quiz, "student-1");
        let review = AttemptReview::new(submission, &quiz);

        assert_eq!(review.answer_key.len(), 1);
        assert_eq!(review.answer_key[0].correct_options, vec![0]);
    }
}
