use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::Question;

/// A quiz with its questions embedded. Keeping the questions inside the
/// quiz document means question mutations, reordering and publication
/// are all single-document writes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub class_id: String,
    pub created_by: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_to: Option<DateTime<Utc>>,
    pub allow_review: bool,
    /// Pass threshold as a percentage, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<u8>,
    /// 1-180 minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u16>,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new_draft(title: &str, class_id: &str, created_by: &str) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            class_id: class_id.to_string(),
            created_by: created_by.to_string(),
            title: title.to_string(),
            description: None,
            is_published: false,
            available_from: None,
            available_to: None,
            allow_review: false,
            passing_score: None,
            time_limit_minutes: None,
            questions: Vec::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// A quiz is open for attempts iff it is published and `now` falls
    /// inside the (half-open on either side) availability window.
    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_published {
            return false;
        }
        if let Some(from) = self.available_from {
            if from > now {
                return false;
            }
        }
        if let Some(to) = self.available_to {
            if to < now {
                return false;
            }
        }
        true
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Next order index when the caller omits one: max + 1, starting at 1.
    pub fn next_order_index(&self) -> u32 {
        self.questions
            .iter()
            .map(|q| q.order_index)
            .max()
            .map(|max| max + 1)
            .unwrap_or(1)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn question_mut(&mut self, question_id: &str) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id == question_id)
    }

    /// Questions in presentation order.
    pub fn questions_in_order(&self) -> Vec<&Question> {
        let mut ordered: Vec<&Question> = self.questions.iter().collect();
        ordered.sort_by_key(|q| q.order_index);
        ordered
    }

    pub fn max_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    pub fn touch(&mut self) {
        self.modified_at = Some(Utc::now());
    }
}
