//! Pure scoring rules. No repository access, no clock: everything here
//! is a function of question definitions and recorded answers.

use std::collections::BTreeSet;

use crate::models::domain::question::{Question, QuestionKind};

/// Exact-match correctness for a multiple-choice question: the selected
/// index set must equal the set of indexes marked correct. Selecting a
/// strict subset or superset of the correct options is wrong.
pub fn is_exact_match(question: &Question, selected: &[u32]) -> bool {
    match &question.kind {
        QuestionKind::MultipleChoice { options } => {
            let correct: BTreeSet<u32> = options
                .iter()
                .enumerate()
                .filter(|(_, opt)| opt.is_correct)
                .map(|(idx, _)| idx as u32)
                .collect();
            let selected: BTreeSet<u32> = selected.iter().copied().collect();
            !correct.is_empty() && selected == correct
        }
        QuestionKind::Written { .. } => false,
    }
}

/// Score for an auto-gradable question: full points or zero. Written
/// questions return `None`; their score comes from the grading teacher.
pub fn auto_score(question: &Question, selected: &[u32]) -> Option<u32> {
    if !question.is_auto_gradable() {
        return None;
    }
    Some(if is_exact_match(question, selected) {
        question.points
    } else {
        0
    })
}

/// total / max * 100. A quiz with no points is worth 0%.
pub fn percentage(total_score: u32, max_points: u32) -> f64 {
    if max_points == 0 {
        return 0.0;
    }
    f64::from(total_score) / f64::from(max_points) * 100.0
}

/// Pass verdict, only when the quiz configures a passing score.
pub fn pass_verdict(percentage_score: f64, passing_score: Option<u8>) -> Option<bool> {
    passing_score.map(|threshold| percentage_score >= f64::from(threshold))
}
