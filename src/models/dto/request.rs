use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{QuestionKind, QuestionOption};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub class_id: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,

    #[serde(default)]
    pub allow_review: bool,

    #[validate(range(min = 0, max = 100))]
    pub passing_score: Option<u8>,

    #[validate(range(min = 1, max = 180))]
    pub time_limit_minutes: Option<u16>,
}

/// Partial metadata update; absent fields keep their current value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,

    pub allow_review: Option<bool>,

    #[validate(range(min = 0, max = 100))]
    pub passing_score: Option<u8>,

    #[validate(range(min = 1, max = 180))]
    pub time_limit_minutes: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTypeInput {
    MultipleChoice,
    Written,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionOptionInput {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,

    pub question_type: QuestionTypeInput,

    pub options: Option<Vec<QuestionOptionInput>>,
    pub sample_answer: Option<String>,

    #[validate(range(min = 1))]
    pub order_index: Option<u32>,

    #[validate(range(min = 1))]
    pub points: Option<u32>,
}

/// Partial question update. Changing `question_type` requires the new
/// type's payload; the old type's fields are dropped with the old kind.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub prompt: Option<String>,

    pub question_type: Option<QuestionTypeInput>,

    pub options: Option<Vec<QuestionOptionInput>>,
    pub sample_answer: Option<String>,

    #[validate(range(min = 1))]
    pub order_index: Option<u32>,

    #[validate(range(min = 1))]
    pub points: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionOrderInput {
    pub question_id: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderQuestionsRequest {
    #[validate(length(min = 1))]
    pub orders: Vec<QuestionOrderInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordAnswerRequest {
    pub selected_options: Option<Vec<u32>>,
    pub written_answer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerGradeInput {
    pub question_id: String,
    pub score: u32,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GradeAttemptRequest {
    #[validate(length(min = 1))]
    pub answers: Vec<AnswerGradeInput>,
    pub total_score: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}

/// Builds the typed question kind from the loosely-shaped wire fields,
/// rejecting option sets the domain cannot represent.
pub fn build_question_kind(
    question_type: QuestionTypeInput,
    options: Option<Vec<QuestionOptionInput>>,
    sample_answer: Option<String>,
) -> AppResult<QuestionKind> {
    match question_type {
        QuestionTypeInput::MultipleChoice => {
            if sample_answer.is_some() {
                return Err(AppError::ValidationError(
                    "sample_answer: only valid for written questions".to_string(),
                ));
            }
            let options = options.ok_or_else(|| {
                AppError::ValidationError(
                    "options: required for multiple choice questions".to_string(),
                )
            })?;
            if options.len() < 2 {
                return Err(AppError::ValidationError(
                    "options: a multiple choice question needs at least two options".to_string(),
                ));
            }
            if !options.iter().any(|opt| opt.is_correct) {
                return Err(AppError::ValidationError(
                    "options: at least one option must be marked correct".to_string(),
                ));
            }
            Ok(QuestionKind::MultipleChoice {
                options: options
                    .into_iter()
                    .map(|opt| QuestionOption {
                        text: opt.text,
                        is_correct: opt.is_correct,
                    })
                    .collect(),
            })
        }
        QuestionTypeInput::Written => {
            if options.is_some() {
                return Err(AppError::ValidationError(
                    "options: only valid for multiple choice questions".to_string(),
                ));
            }
            Ok(QuestionKind::Written { sample_answer })
        }
    }
}
