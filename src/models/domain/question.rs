use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single question embedded in its quiz. The kind carries the fields
/// that only exist for that question type, so a type switch can never
/// leave the other type's data behind.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub order_index: u32,
    pub points: u32,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "question_type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice { options: Vec<QuestionOption> },
    Written {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sample_answer: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
}

impl Question {
    pub fn new(prompt: &str, kind: QuestionKind, order_index: u32, points: u32) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.to_string(),
            order_index,
            points,
            kind,
        }
    }

    /// Multiple-choice questions can be scored without human judgment.
    pub fn is_auto_gradable(&self) -> bool {
        matches!(self.kind, QuestionKind::MultipleChoice { .. })
    }

    /// Indexes of the options marked correct, for multiple-choice only.
    pub fn correct_option_indexes(&self) -> Option<Vec<u32>> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => Some(
                options
                    .iter()
                    .enumerate()
                    .filter(|(_, opt)| opt.is_correct)
                    .map(|(idx, _)| idx as u32)
                    .collect(),
            ),
            QuestionKind::Written { .. } => None,
        }
    }

    pub fn option_count(&self) -> Option<usize> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => Some(options.len()),
            QuestionKind::Written { .. } => None,
        }
    }
}
