use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::{Principal, Role},
    config::CapabilityPolicy,
    errors::{AppError, AppResult},
    models::domain::{QuestionKind, Quiz, Submission, SubmissionState},
    models::dto::request::{GradeAttemptRequest, PaginationParams, RecordAnswerRequest},
    models::dto::response::AttemptReview,
    repositories::{ClassRepository, QuizRepository, SubmissionRepository},
    services::scoring,
};

/// The life of one student's attempt: start, answer, complete, grade.
/// Every transition validates its preconditions first and commits as a
/// single conditional write, so a lost race surfaces as a typed error
/// instead of a partial update.
pub struct SubmissionService {
    submission_repository: Arc<dyn SubmissionRepository>,
    quiz_repository: Arc<dyn QuizRepository>,
    class_repository: Arc<dyn ClassRepository>,
    capabilities: CapabilityPolicy,
}

fn require_student(principal: &Principal) -> AppResult<()> {
    if principal.role != Role::Student {
        return Err(AppError::Forbidden("student role required".to_string()));
    }
    Ok(())
}

fn require_teacher(principal: &Principal) -> AppResult<()> {
    if principal.role != Role::Teacher {
        return Err(AppError::Forbidden("teacher role required".to_string()));
    }
    Ok(())
}

impl SubmissionService {
    pub fn new(
        submission_repository: Arc<dyn SubmissionRepository>,
        quiz_repository: Arc<dyn QuizRepository>,
        class_repository: Arc<dyn ClassRepository>,
        capabilities: CapabilityPolicy,
    ) -> Self {
        Self {
            submission_repository,
            quiz_repository,
            class_repository,
            capabilities,
        }
    }

    async fn quiz_for_submission(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    /// A submission as seen by its owning student. Anyone else gets
    /// NotFound so probing cannot reveal whether the attempt exists.
    async fn owned_submission(
        &self,
        principal: &Principal,
        submission_id: &str,
    ) -> AppResult<Submission> {
        let submission = self
            .submission_repository
            .find_by_id(submission_id)
            .await?
            .filter(|s| s.student_id == principal.user_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Submission with id '{}' not found",
                    submission_id
                ))
            })?;
        Ok(submission)
    }

    /// Idempotent start: an in-progress attempt is returned as-is, a
    /// completed one refuses a restart, and only then is a fresh attempt
    /// created. Losing the unique-index race to a concurrent start
    /// degrades into the lookup path.
    pub async fn start_attempt(
        &self,
        principal: &Principal,
        quiz_id: &str,
    ) -> AppResult<Submission> {
        require_student(principal)?;

        let quiz = self.quiz_for_submission(quiz_id).await?;

        if !quiz.is_available_at(Utc::now()) {
            return Err(AppError::BadRequest(
                "quiz is not currently available".to_string(),
            ));
        }

        if !self
            .class_repository
            .is_enrolled(&quiz.class_id, &principal.user_id)
            .await?
        {
            return Err(AppError::Forbidden(
                "not enrolled in this quiz's class".to_string(),
            ));
        }

        if quiz.question_count() == 0 {
            return Err(AppError::BadRequest("quiz has no questions".to_string()));
        }

        if let Some(existing) = self
            .submission_repository
            .find_by_quiz_and_student(quiz_id, &principal.user_id)
            .await?
        {
            return if existing.is_complete {
                Err(AppError::BadRequest("quiz already completed".to_string()))
            } else {
                Ok(existing)
            };
        }

        let submission = Submission::new_for_quiz(&quiz, &principal.user_id);
        match self.submission_repository.create(submission).await {
            Ok(created) => Ok(created),
            Err(AppError::AlreadyExists(_)) => {
                let existing = self
                    .submission_repository
                    .find_by_quiz_and_student(quiz_id, &principal.user_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(
                            "attempt conflict reported but no attempt found".to_string(),
                        )
                    })?;
                if existing.is_complete {
                    Err(AppError::BadRequest("quiz already completed".to_string()))
                } else {
                    Ok(existing)
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Visible to the owning student and the quiz's teacher.
    pub async fn get_attempt(
        &self,
        principal: &Principal,
        submission_id: &str,
    ) -> AppResult<Submission> {
        let submission = self
            .submission_repository
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Submission with id '{}' not found",
                    submission_id
                ))
            })?;

        if submission.student_id == principal.user_id {
            return Ok(submission);
        }

        let quiz = self.quiz_for_submission(&submission.quiz_id).await?;
        if quiz.created_by == principal.user_id {
            return Ok(submission);
        }

        Err(AppError::NotFound(format!(
            "Submission with id '{}' not found",
            submission_id
        )))
    }

    pub async fn record_answer(
        &self,
        principal: &Principal,
        submission_id: &str,
        question_id: &str,
        request: RecordAnswerRequest,
    ) -> AppResult<Submission> {
        require_student(principal)?;
        let mut submission = self.owned_submission(principal, submission_id).await?;

        if submission.state() != SubmissionState::InProgress {
            return Err(AppError::BadRequest(
                "submission is already completed".to_string(),
            ));
        }

        let quiz = self.quiz_for_submission(&submission.quiz_id).await?;
        let question = quiz.question(question_id).ok_or_else(|| {
            AppError::NotFound(format!("Question with id '{}' not found", question_id))
        })?;

        let (selected_options, written_answer) = match &question.kind {
            QuestionKind::MultipleChoice { options } => {
                if request.written_answer.is_some() {
                    return Err(AppError::ValidationError(
                        "written_answer: only valid for written questions".to_string(),
                    ));
                }
                let selected = request.selected_options.ok_or_else(|| {
                    AppError::ValidationError(
                        "selected_options: required for multiple choice questions".to_string(),
                    )
                })?;
                let option_count = options.len() as u32;
                if selected.iter().any(|&idx| idx >= option_count) {
                    return Err(AppError::ValidationError(
                        "selected_options: option index out of range".to_string(),
                    ));
                }
                (selected, None)
            }
            QuestionKind::Written { .. } => {
                if request.selected_options.is_some() {
                    return Err(AppError::ValidationError(
                        "selected_options: only valid for multiple choice questions".to_string(),
                    ));
                }
                let answer = request.written_answer.ok_or_else(|| {
                    AppError::ValidationError(
                        "written_answer: required for written questions".to_string(),
                    )
                })?;
                (Vec::new(), Some(answer))
            }
        };

        let slot = submission.answer_mut(question_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Question with id '{}' is not part of this submission",
                question_id
            ))
        })?;
        slot.selected_options = selected_options;
        slot.written_answer = written_answer;
        submission.touch();

        if !self
            .submission_repository
            .replace_if_in_progress(&submission)
            .await?
        {
            return Err(AppError::BadRequest(
                "submission is already completed".to_string(),
            ));
        }

        Ok(submission)
    }

    /// InProgress -> CompleteUngraded. Multiple-choice slots are scored
    /// here; written slots wait for the teacher.
    pub async fn complete_attempt(
        &self,
        principal: &Principal,
        submission_id: &str,
    ) -> AppResult<Submission> {
        require_student(principal)?;
        let mut submission = self.owned_submission(principal, submission_id).await?;

        if submission.state() != SubmissionState::InProgress {
            return Err(AppError::BadRequest(
                "submission is already completed".to_string(),
            ));
        }

        let quiz = self.quiz_for_submission(&submission.quiz_id).await?;

        submission.submitted_at = Some(Utc::now());
        submission.is_complete = true;

        for answer in &mut submission.answers {
            if let Some(question) = quiz.question(&answer.question_id) {
                if let Some(score) = scoring::auto_score(question, &answer.selected_options) {
                    answer.score = Some(score);
                    answer.is_evaluated = true;
                }
            }
        }
        submission.touch();

        if !self
            .submission_repository
            .replace_if_in_progress(&submission)
            .await?
        {
            return Err(AppError::BadRequest(
                "submission is already completed".to_string(),
            ));
        }

        Ok(submission)
    }

    /// CompleteUngraded -> Graded, by the quiz's teacher. Graded is
    /// terminal unless the re-grading capability is enabled.
    pub async fn grade_attempt(
        &self,
        principal: &Principal,
        submission_id: &str,
        request: GradeAttemptRequest,
    ) -> AppResult<Submission> {
        require_teacher(principal)?;
        request.validate()?;

        let mut submission = self
            .submission_repository
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Submission with id '{}' not found",
                    submission_id
                ))
            })?;

        let quiz = self.quiz_for_submission(&submission.quiz_id).await?;
        if quiz.created_by != principal.user_id {
            return Err(AppError::Forbidden(
                "quiz belongs to another teacher".to_string(),
            ));
        }

        let regrading = match submission.state() {
            SubmissionState::InProgress => {
                return Err(AppError::BadRequest(
                    "submission is not yet completed".to_string(),
                ));
            }
            SubmissionState::Graded => {
                if !self.capabilities.allow_regrade {
                    return Err(AppError::BadRequest(
                        "submission is already graded".to_string(),
                    ));
                }
                true
            }
            SubmissionState::CompleteUngraded => false,
        };

        for grade in &request.answers {
            let question = quiz.question(&grade.question_id).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "question '{}' does not belong to this quiz",
                    grade.question_id
                ))
            })?;

            if self.capabilities.enforce_score_ceiling && grade.score > question.points {
                return Err(AppError::ValidationError(format!(
                    "score for question '{}' exceeds its {} points",
                    grade.question_id, question.points
                )));
            }

            let slot = submission.answer_mut(&grade.question_id).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "question '{}' is not part of this submission",
                    grade.question_id
                ))
            })?;
            slot.score = Some(grade.score);
            slot.feedback = grade.feedback.clone();
            slot.is_evaluated = true;
        }

        let percentage = scoring::percentage(request.total_score, quiz.max_points());
        submission.total_score = Some(request.total_score);
        submission.percentage_score = Some(percentage);
        submission.is_passed = scoring::pass_verdict(percentage, quiz.passing_score);
        submission.graded_by = Some(principal.user_id.clone());
        submission.graded_at = Some(Utc::now());
        submission.touch();

        let written = if regrading {
            self.submission_repository.replace(&submission).await?
        } else {
            self.submission_repository
                .replace_if_ungraded(&submission)
                .await?
        };
        if !written {
            return Err(AppError::BadRequest(
                "submission is already graded".to_string(),
            ));
        }

        Ok(submission)
    }

    pub async fn list_attempts(
        &self,
        principal: &Principal,
        quiz_id: &str,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Submission>, i64)> {
        require_teacher(principal)?;

        let quiz = self.quiz_for_submission(quiz_id).await?;
        if quiz.created_by != principal.user_id {
            return Err(AppError::Forbidden(
                "quiz belongs to another teacher".to_string(),
            ));
        }

        self.submission_repository
            .list_by_quiz(quiz_id, pagination.offset(), pagination.limit())
            .await
    }

    /// Post-grading review for the owning student, gated on the quiz's
    /// review flag.
    pub async fn review_attempt(
        &self,
        principal: &Principal,
        submission_id: &str,
    ) -> AppResult<AttemptReview> {
        require_student(principal)?;
        let submission = self.owned_submission(principal, submission_id).await?;

        if submission.state() != SubmissionState::Graded {
            return Err(AppError::BadRequest(
                "submission has not been graded yet".to_string(),
            ));
        }

        let quiz = self.quiz_for_submission(&submission.quiz_id).await?;
        if !quiz.allow_review {
            return Err(AppError::Forbidden(
                "review is not enabled for this quiz".to_string(),
            ));
        }

        Ok(AttemptReview::new(submission, &quiz))
    }
}
