//! Shared fixtures for unit tests.

pub mod fixtures {
    use crate::models::domain::{
        ClassRecord, Question, QuestionKind, QuestionOption, Quiz,
    };

    /// Multiple-choice question with two options; the first is correct.
    pub fn mc_question(order_index: u32, points: u32) -> Question {
        Question::new(
            "2 + 2 = ?",
            QuestionKind::MultipleChoice {
                options: vec![
                    QuestionOption {
                        text: "4".to_string(),
                        is_correct: true,
                    },
                    QuestionOption {
                        text: "5".to_string(),
                        is_correct: false,
                    },
                ],
            },
            order_index,
            points,
        )
    }

    pub fn written_question(order_index: u32, points: u32) -> Question {
        Question::new(
            "Show your working",
            QuestionKind::Written { sample_answer: None },
            order_index,
            points,
        )
    }

    /// Unpublished quiz owned by teacher-1 in class-1, no questions.
    pub fn draft_quiz() -> Quiz {
        Quiz::new_draft("Algebra", "class-1", "teacher-1")
    }

    /// Published quiz with one auto-gradable and one written question,
    /// worth five points each.
    pub fn open_quiz() -> Quiz {
        let mut quiz = draft_quiz();
        quiz.is_published = true;
        quiz.questions.push(mc_question(1, 5));
        quiz.questions.push(written_question(2, 5));
        quiz
    }

    pub fn class_record(teacher_id: &str) -> ClassRecord {
        ClassRecord {
            id: "class-1".to_string(),
            name: "Year 10".to_string(),
            teacher_id: teacher_id.to_string(),
            student_ids: vec!["student-1".to_string()],
            created_at: None,
        }
    }
}
