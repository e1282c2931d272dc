use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz::Quiz;

/// One student's attempt at one quiz. The answer slots and the grading
/// aggregates live in the same record so every state transition is a
/// single atomic write.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Submission {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub is_complete: bool,
    pub answers: Vec<SubmissionAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmissionAnswer {
    pub question_id: String,
    pub selected_options: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub written_answer: Option<String>,
    pub is_evaluated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl SubmissionAnswer {
    fn placeholder(question_id: &str) -> Self {
        SubmissionAnswer {
            question_id: question_id.to_string(),
            selected_options: Vec::new(),
            written_answer: None,
            is_evaluated: false,
            score: None,
            feedback: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    InProgress,
    CompleteUngraded,
    Graded,
}

impl Submission {
    /// Fresh attempt with one empty answer slot per question, in
    /// presentation order.
    pub fn new_for_quiz(quiz: &Quiz, student_id: &str) -> Self {
        let answers = quiz
            .questions_in_order()
            .iter()
            .map(|q| SubmissionAnswer::placeholder(&q.id))
            .collect();

        Submission {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            student_id: student_id.to_string(),
            started_at: Utc::now(),
            submitted_at: None,
            is_complete: false,
            answers,
            total_score: None,
            percentage_score: None,
            is_passed: None,
            graded_by: None,
            graded_at: None,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn state(&self) -> SubmissionState {
        if !self.is_complete {
            SubmissionState::InProgress
        } else if self.total_score.is_none() {
            SubmissionState::CompleteUngraded
        } else {
            SubmissionState::Graded
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<&SubmissionAnswer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    pub fn answer_mut(&mut self, question_id: &str) -> Option<&mut SubmissionAnswer> {
        self.answers
            .iter_mut()
            .find(|a| a.question_id == question_id)
    }

    pub fn touch(&mut self) {
        self.modified_at = Some(Utc::now());
    }
}
