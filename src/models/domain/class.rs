use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only view of a class. Roster management (join codes, adding and
/// removing students) belongs to the class service; this service only
/// asks who owns a class and who is enrolled in it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassRecord {
    pub id: String,
    pub name: String,
    pub teacher_id: String,
    pub student_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ClassRecord {
    pub fn has_student(&self, student_id: &str) -> bool {
        self.student_ids.iter().any(|id| id == student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_student_checks_roster() {
        let class = ClassRecord {
            id: "class-1".to_string(),
            name: "Year 10 History".to_string(),
            teacher_id: "teacher-1".to_string(),
            student_ids: vec!["student-1".to_string(), "student-2".to_string()],
            created_at: Some(Utc::now()),
        };

        assert!(class.has_student("student-1"));
        assert!(!class.has_student("student-3"));
    }
}
