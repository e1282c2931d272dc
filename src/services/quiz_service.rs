use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    auth::{Principal, Role},
    config::CapabilityPolicy,
    errors::{AppError, AppResult},
    models::domain::{Question, Quiz},
    models::dto::request::{
        build_question_kind, CreateQuestionRequest, CreateQuizRequest, PaginationParams,
        QuestionTypeInput, ReorderQuestionsRequest, UpdateQuestionRequest, UpdateQuizRequest,
    },
    models::dto::response::QuizTakingView,
    repositories::{ClassRepository, QuizRepository, SubmissionRepository},
};

/// Quiz authoring, the draft -> published gate, and the question store.
pub struct QuizService {
    quiz_repository: Arc<dyn QuizRepository>,
    class_repository: Arc<dyn ClassRepository>,
    submission_repository: Arc<dyn SubmissionRepository>,
    capabilities: CapabilityPolicy,
}

fn require_teacher(principal: &Principal) -> AppResult<()> {
    if principal.role != Role::Teacher {
        return Err(AppError::Forbidden("teacher role required".to_string()));
    }
    Ok(())
}

fn require_student(principal: &Principal) -> AppResult<()> {
    if principal.role != Role::Student {
        return Err(AppError::Forbidden("student role required".to_string()));
    }
    Ok(())
}

fn validate_schedule(
    available_from: Option<DateTime<Utc>>,
    available_to: Option<DateTime<Utc>>,
) -> AppResult<()> {
    if let (Some(from), Some(to)) = (available_from, available_to) {
        if to <= from {
            return Err(AppError::ValidationError(
                "available_to: must be after available_from".to_string(),
            ));
        }
    }
    Ok(())
}

fn ensure_draft(quiz: &Quiz) -> AppResult<()> {
    if quiz.is_published {
        return Err(AppError::BadRequest(
            "cannot modify a published quiz".to_string(),
        ));
    }
    Ok(())
}

impl QuizService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        class_repository: Arc<dyn ClassRepository>,
        submission_repository: Arc<dyn SubmissionRepository>,
        capabilities: CapabilityPolicy,
    ) -> Self {
        Self {
            quiz_repository,
            class_repository,
            submission_repository,
            capabilities,
        }
    }

    /// Quiz loaded for a mutating teacher operation: must exist and be
    /// owned by the caller.
    async fn owned_quiz(&self, principal: &Principal, quiz_id: &str) -> AppResult<Quiz> {
        require_teacher(principal)?;

        let quiz = self
            .quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        if quiz.created_by != principal.user_id {
            return Err(AppError::Forbidden(
                "quiz belongs to another teacher".to_string(),
            ));
        }

        Ok(quiz)
    }

    pub async fn create_quiz(
        &self,
        principal: &Principal,
        request: CreateQuizRequest,
    ) -> AppResult<Quiz> {
        require_teacher(principal)?;
        request.validate()?;
        validate_schedule(request.available_from, request.available_to)?;

        let class = self
            .class_repository
            .find_by_id(&request.class_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Class with id '{}' not found", request.class_id))
            })?;

        if class.teacher_id != principal.user_id {
            return Err(AppError::Forbidden(
                "class belongs to another teacher".to_string(),
            ));
        }

        let mut quiz = Quiz::new_draft(&request.title, &request.class_id, &principal.user_id);
        quiz.description = request.description;
        quiz.available_from = request.available_from;
        quiz.available_to = request.available_to;
        quiz.allow_review = request.allow_review;
        quiz.passing_score = request.passing_score;
        quiz.time_limit_minutes = request.time_limit_minutes;

        self.quiz_repository.create(quiz).await
    }

    pub async fn get_quiz(&self, principal: &Principal, quiz_id: &str) -> AppResult<Quiz> {
        self.owned_quiz(principal, quiz_id).await
    }

    pub async fn list_quizzes(
        &self,
        principal: &Principal,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        require_teacher(principal)?;
        self.quiz_repository
            .list_by_teacher(&principal.user_id, pagination.offset(), pagination.limit())
            .await
    }

    /// Published quizzes of a class that are currently open, for an
    /// enrolled student. The availability filter runs on the fetched
    /// page; `total` counts all published quizzes of the class.
    pub async fn list_available_quizzes(
        &self,
        principal: &Principal,
        class_id: &str,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<QuizTakingView>, i64)> {
        require_student(principal)?;

        if !self
            .class_repository
            .is_enrolled(class_id, &principal.user_id)
            .await?
        {
            return Err(AppError::Forbidden(
                "not enrolled in this class".to_string(),
            ));
        }

        let (quizzes, total) = self
            .quiz_repository
            .list_published_by_class(class_id, pagination.offset(), pagination.limit())
            .await?;

        let now = Utc::now();
        let views = quizzes
            .iter()
            .filter(|quiz| quiz.is_available_at(now))
            .map(QuizTakingView::from)
            .collect();

        Ok((views, total))
    }

    /// The sanitized view a student takes the quiz from.
    pub async fn quiz_for_taking(
        &self,
        principal: &Principal,
        quiz_id: &str,
    ) -> AppResult<QuizTakingView> {
        require_student(principal)?;

        let quiz = self
            .quiz_repository
            .find_by_id(quiz_id)
            .await?
            .filter(|quiz| quiz.is_published)
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        if !self
            .class_repository
            .is_enrolled(&quiz.class_id, &principal.user_id)
            .await?
        {
            return Err(AppError::Forbidden(
                "not enrolled in this quiz's class".to_string(),
            ));
        }

        if !quiz.is_available_at(Utc::now()) {
            return Err(AppError::BadRequest(
                "quiz is not currently available".to_string(),
            ));
        }

        Ok(QuizTakingView::from(&quiz))
    }

    pub async fn update_quiz(
        &self,
        principal: &Principal,
        quiz_id: &str,
        request: UpdateQuizRequest,
    ) -> AppResult<Quiz> {
        request.validate()?;
        let mut quiz = self.owned_quiz(principal, quiz_id).await?;

        if let Some(title) = request.title {
            quiz.title = title;
        }
        if let Some(description) = request.description {
            quiz.description = Some(description);
        }
        if let Some(from) = request.available_from {
            quiz.available_from = Some(from);
        }
        if let Some(to) = request.available_to {
            quiz.available_to = Some(to);
        }
        if let Some(allow_review) = request.allow_review {
            quiz.allow_review = allow_review;
        }
        if let Some(passing_score) = request.passing_score {
            quiz.passing_score = Some(passing_score);
        }
        if let Some(time_limit) = request.time_limit_minutes {
            quiz.time_limit_minutes = Some(time_limit);
        }

        validate_schedule(quiz.available_from, quiz.available_to)?;
        quiz.touch();

        if !self.quiz_repository.update_metadata(&quiz).await? {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz_id
            )));
        }

        Ok(quiz)
    }

    /// Draft -> published, one-way. The storage-level condition re-checks
    /// "still a draft, still has questions", so a racing question
    /// deletion cannot slip a publish through on a stale count.
    pub async fn publish_quiz(&self, principal: &Principal, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self.owned_quiz(principal, quiz_id).await?;

        if quiz.is_published {
            return Err(AppError::BadRequest(
                "quiz is already published".to_string(),
            ));
        }
        if quiz.question_count() == 0 {
            return Err(AppError::BadRequest(
                "cannot publish a quiz with no questions".to_string(),
            ));
        }

        if !self.quiz_repository.mark_published(quiz_id).await? {
            // The conditional update lost a race; re-read to name why.
            let current = self.quiz_repository.find_by_id(quiz_id).await?;
            return Err(match current {
                Some(q) if q.is_published => {
                    AppError::BadRequest("quiz is already published".to_string())
                }
                Some(_) => {
                    AppError::BadRequest("cannot publish a quiz with no questions".to_string())
                }
                None => AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)),
            });
        }

        self.quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    pub async fn unpublish_quiz(&self, principal: &Principal, quiz_id: &str) -> AppResult<Quiz> {
        if !self.capabilities.allow_unpublish {
            return Err(AppError::BadRequest(
                "unpublishing is not enabled".to_string(),
            ));
        }

        let quiz = self.owned_quiz(principal, quiz_id).await?;
        if !quiz.is_published {
            return Err(AppError::BadRequest("quiz is not published".to_string()));
        }

        self.quiz_repository.mark_unpublished(quiz_id).await?;

        self.quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    /// Deletes the quiz and every submission made against it.
    pub async fn delete_quiz(&self, principal: &Principal, quiz_id: &str) -> AppResult<()> {
        self.owned_quiz(principal, quiz_id).await?;

        let removed = self.submission_repository.delete_by_quiz(quiz_id).await?;
        if removed > 0 {
            log::info!("Deleted {} submissions for quiz {}", removed, quiz_id);
        }
        self.quiz_repository.delete(quiz_id).await?;

        Ok(())
    }

    pub async fn add_question(
        &self,
        principal: &Principal,
        quiz_id: &str,
        request: CreateQuestionRequest,
    ) -> AppResult<Question> {
        request.validate()?;
        let mut quiz = self.owned_quiz(principal, quiz_id).await?;
        ensure_draft(&quiz)?;

        let kind =
            build_question_kind(request.question_type, request.options, request.sample_answer)?;
        let order_index = request.order_index.unwrap_or_else(|| quiz.next_order_index());
        let points = request.points.unwrap_or(1);

        let question = Question::new(&request.prompt, kind, order_index, points);
        quiz.questions.push(question.clone());
        quiz.touch();

        if !self.quiz_repository.replace_draft(&quiz).await? {
            return Err(AppError::BadRequest(
                "cannot modify a published quiz".to_string(),
            ));
        }

        Ok(question)
    }

    pub async fn update_question(
        &self,
        principal: &Principal,
        quiz_id: &str,
        question_id: &str,
        request: UpdateQuestionRequest,
    ) -> AppResult<Question> {
        request.validate()?;
        let mut quiz = self.owned_quiz(principal, quiz_id).await?;
        ensure_draft(&quiz)?;

        let updated = {
            let question = quiz.question_mut(question_id).ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })?;

            if let Some(prompt) = request.prompt {
                question.prompt = prompt;
            }
            if let Some(points) = request.points {
                question.points = points;
            }
            if let Some(order_index) = request.order_index {
                question.order_index = order_index;
            }

            if let Some(new_type) = request.question_type {
                // A type switch replaces the kind wholesale; the new
                // type's payload must come with the request.
                question.kind =
                    build_question_kind(new_type, request.options, request.sample_answer)?;
            } else if request.options.is_some() || request.sample_answer.is_some() {
                let current_type = match question.kind {
                    crate::models::domain::QuestionKind::MultipleChoice { .. } => {
                        QuestionTypeInput::MultipleChoice
                    }
                    crate::models::domain::QuestionKind::Written { .. } => {
                        QuestionTypeInput::Written
                    }
                };
                question.kind =
                    build_question_kind(current_type, request.options, request.sample_answer)?;
            }

            question.clone()
        };

        quiz.touch();
        if !self.quiz_repository.replace_draft(&quiz).await? {
            return Err(AppError::BadRequest(
                "cannot modify a published quiz".to_string(),
            ));
        }

        Ok(updated)
    }

    pub async fn delete_question(
        &self,
        principal: &Principal,
        quiz_id: &str,
        question_id: &str,
    ) -> AppResult<()> {
        let mut quiz = self.owned_quiz(principal, quiz_id).await?;
        ensure_draft(&quiz)?;

        if quiz.question(question_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question_id
            )));
        }

        quiz.questions.retain(|q| q.id != question_id);
        quiz.touch();

        if !self.quiz_repository.replace_draft(&quiz).await? {
            return Err(AppError::BadRequest(
                "cannot modify a published quiz".to_string(),
            ));
        }

        Ok(())
    }

    /// Bulk order reassignment, all-or-nothing. Every entry must name a
    /// question of this quiz; the single document replace keeps the
    /// reassignment atomic.
    pub async fn reorder_questions(
        &self,
        principal: &Principal,
        quiz_id: &str,
        request: ReorderQuestionsRequest,
    ) -> AppResult<Vec<Question>> {
        request.validate()?;
        let mut quiz = self.owned_quiz(principal, quiz_id).await?;
        ensure_draft(&quiz)?;

        for order in &request.orders {
            if order.order_index < 1 {
                return Err(AppError::ValidationError(
                    "order_index: must be at least 1".to_string(),
                ));
            }
            if quiz.question(&order.question_id).is_none() {
                return Err(AppError::ValidationError(format!(
                    "question '{}' does not belong to this quiz",
                    order.question_id
                )));
            }
        }

        for order in &request.orders {
            if let Some(question) = quiz.question_mut(&order.question_id) {
                question.order_index = order.order_index;
            }
        }
        quiz.touch();

        if !self.quiz_repository.replace_draft(&quiz).await? {
            return Err(AppError::BadRequest(
                "cannot modify a published quiz".to_string(),
            ));
        }

        Ok(quiz.questions_in_order().into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::QuestionKind;
    use crate::models::dto::request::{QuestionOptionInput, QuestionOrderInput};
    use crate::repositories::{
        MockClassRepository, MockQuizRepository, MockSubmissionRepository,
    };
    use crate::test_utils::fixtures::{class_record, draft_quiz, mc_question as fixture_question};

    fn teacher() -> Principal {
        Principal::new("teacher-1", Role::Teacher)
    }

    fn student() -> Principal {
        Principal::new("student-1", Role::Student)
    }

    fn mc_question(order_index: u32) -> Question {
        fixture_question(order_index, 1)
    }

    fn service(
        quiz_repo: MockQuizRepository,
        class_repo: MockClassRepository,
        capabilities: CapabilityPolicy,
    ) -> QuizService {
        QuizService::new(
            Arc::new(quiz_repo),
            Arc::new(class_repo),
            Arc::new(MockSubmissionRepository::new()),
            capabilities,
        )
    }

    fn mc_request() -> CreateQuestionRequest {
        CreateQuestionRequest {
            prompt: "2 + 2 = ?".to_string(),
            question_type: QuestionTypeInput::MultipleChoice,
            options: Some(vec![
                QuestionOptionInput {
                    text: "4".to_string(),
                    is_correct: true,
                },
                QuestionOptionInput {
                    text: "5".to_string(),
                    is_correct: false,
                },
            ]),
            sample_answer: None,
            order_index: None,
            points: None,
        }
    }

    #[tokio::test]
    async fn create_quiz_rejects_unowned_class() {
        let mut class_repo = MockClassRepository::new();
        let class = class_record("someone-else");
        class_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(class.clone())));

        let svc = service(
            MockQuizRepository::new(),
            class_repo,
            CapabilityPolicy::default(),
        );

        let request = CreateQuizRequest {
            title: "Algebra".to_string(),
            class_id: "class-1".to_string(),
            description: None,
            available_from: None,
            available_to: None,
            allow_review: false,
            passing_score: None,
            time_limit_minutes: None,
        };

        let result = svc.create_quiz(&teacher(), request).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn create_quiz_rejects_inverted_schedule() {
        let svc = service(
            MockQuizRepository::new(),
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let now = Utc::now();
        let request = CreateQuizRequest {
            title: "Algebra".to_string(),
            class_id: "class-1".to_string(),
            description: None,
            available_from: Some(now),
            available_to: Some(now - chrono::Duration::hours(1)),
            allow_review: false,
            passing_score: None,
            time_limit_minutes: None,
        };

        let result = svc.create_quiz(&teacher(), request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn publish_fails_with_zero_questions() {
        let mut quiz_repo = MockQuizRepository::new();
        quiz_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(draft_quiz())));
        quiz_repo.expect_mark_published().never();

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let result = svc.publish_quiz(&teacher(), "quiz-1").await;
        assert!(
            matches!(result, Err(AppError::BadRequest(ref msg)) if msg.contains("no questions"))
        );
    }

    #[tokio::test]
    async fn publish_succeeds_with_questions() {
        let mut quiz = draft_quiz();
        quiz.questions.push(mc_question(1));
        let quiz_id = quiz.id.clone();

        let mut published = quiz.clone();
        published.is_published = true;

        let mut quiz_repo = MockQuizRepository::new();
        let mut responses = vec![quiz.clone(), published.clone()].into_iter();
        quiz_repo
            .expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(responses.next()));
        quiz_repo
            .expect_mark_published()
            .times(1)
            .returning(|_| Ok(true));

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let result = svc
            .publish_quiz(&teacher(), &quiz_id)
            .await
            .expect("publish should succeed");
        assert!(result.is_published);
    }

    #[tokio::test]
    async fn publish_by_non_owner_is_forbidden() {
        let mut quiz_repo = MockQuizRepository::new();
        quiz_repo.expect_find_by_id().returning(|_| {
            let mut quiz = draft_quiz();
            quiz.created_by = "someone-else".to_string();
            Ok(Some(quiz))
        });

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let result = svc.publish_quiz(&teacher(), "quiz-1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn add_question_assigns_first_and_next_order_index() {
        let mut quiz_repo = MockQuizRepository::new();
        quiz_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(draft_quiz())));
        quiz_repo.expect_replace_draft().returning(|_| Ok(true));

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let question = svc
            .add_question(&teacher(), "quiz-1", mc_request())
            .await
            .expect("question should be added");
        assert_eq!(question.order_index, 1);
        assert_eq!(question.points, 1);

        // Same service, quiz that already has a question at index 1.
        let mut quiz_repo = MockQuizRepository::new();
        quiz_repo.expect_find_by_id().returning(|_| {
            let mut quiz = draft_quiz();
            quiz.questions.push(mc_question(1));
            Ok(Some(quiz))
        });
        quiz_repo.expect_replace_draft().returning(|_| Ok(true));

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let question = svc
            .add_question(&teacher(), "quiz-1", mc_request())
            .await
            .expect("question should be added");
        assert_eq!(question.order_index, 2);
    }

    #[tokio::test]
    async fn add_question_rejects_published_quiz() {
        let mut quiz_repo = MockQuizRepository::new();
        quiz_repo.expect_find_by_id().returning(|_| {
            let mut quiz = draft_quiz();
            quiz.is_published = true;
            quiz.questions.push(mc_question(1));
            Ok(Some(quiz))
        });
        quiz_repo.expect_replace_draft().never();

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let result = svc.add_question(&teacher(), "quiz-1", mc_request()).await;
        assert!(
            matches!(result, Err(AppError::BadRequest(ref msg)) if msg.contains("published"))
        );
    }

    #[tokio::test]
    async fn add_question_rejects_option_set_with_no_correct_answer() {
        let mut quiz_repo = MockQuizRepository::new();
        quiz_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(draft_quiz())));
        quiz_repo.expect_replace_draft().never();

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let mut request = mc_request();
        request.options = Some(vec![
            QuestionOptionInput {
                text: "4".to_string(),
                is_correct: false,
            },
            QuestionOptionInput {
                text: "5".to_string(),
                is_correct: false,
            },
        ]);

        let result = svc.add_question(&teacher(), "quiz-1", request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn update_question_type_switch_replaces_kind() {
        let existing = mc_question(1);
        let question_id = existing.id.clone();

        let mut quiz_repo = MockQuizRepository::new();
        let stored = {
            let mut quiz = draft_quiz();
            quiz.questions.push(existing);
            quiz
        };
        quiz_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        quiz_repo.expect_replace_draft().returning(|_| Ok(true));

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let request = UpdateQuestionRequest {
            prompt: None,
            question_type: Some(QuestionTypeInput::Written),
            options: None,
            sample_answer: Some("four".to_string()),
            order_index: None,
            points: None,
        };

        let updated = svc
            .update_question(&teacher(), "quiz-1", &question_id, request)
            .await
            .expect("update should succeed");

        assert_eq!(
            updated.kind,
            QuestionKind::Written {
                sample_answer: Some("four".to_string())
            }
        );
    }

    #[tokio::test]
    async fn update_question_rejects_options_on_written_without_type_change() {
        let existing = Question::new(
            "Explain",
            QuestionKind::Written { sample_answer: None },
            1,
            1,
        );
        let question_id = existing.id.clone();

        let mut quiz_repo = MockQuizRepository::new();
        let stored = {
            let mut quiz = draft_quiz();
            quiz.questions.push(existing);
            quiz
        };
        quiz_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let request = UpdateQuestionRequest {
            prompt: None,
            question_type: None,
            options: Some(vec![
                QuestionOptionInput {
                    text: "a".to_string(),
                    is_correct: true,
                },
                QuestionOptionInput {
                    text: "b".to_string(),
                    is_correct: false,
                },
            ]),
            sample_answer: None,
            order_index: None,
            points: None,
        };

        let result = svc
            .update_question(&teacher(), "quiz-1", &question_id, request)
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn reorder_rejects_foreign_question_before_writing() {
        let mut quiz_repo = MockQuizRepository::new();
        quiz_repo.expect_find_by_id().returning(|_| {
            let mut quiz = draft_quiz();
            quiz.questions.push(mc_question(1));
            Ok(Some(quiz))
        });
        quiz_repo.expect_replace_draft().never();

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let request = ReorderQuestionsRequest {
            orders: vec![QuestionOrderInput {
                question_id: "question-from-another-quiz".to_string(),
                order_index: 1,
            }],
        };

        let result = svc.reorder_questions(&teacher(), "quiz-1", request).await;
        assert!(
            matches!(result, Err(AppError::ValidationError(ref msg)) if msg.contains("belong"))
        );
    }

    #[tokio::test]
    async fn reorder_swaps_presentation_order() {
        let q1 = mc_question(1);
        let q2 = mc_question(2);
        let (id1, id2) = (q1.id.clone(), q2.id.clone());

        let mut quiz_repo = MockQuizRepository::new();
        let stored = {
            let mut quiz = draft_quiz();
            quiz.questions.push(q1);
            quiz.questions.push(q2);
            quiz
        };
        quiz_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        quiz_repo.expect_replace_draft().returning(|_| Ok(true));

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let request = ReorderQuestionsRequest {
            orders: vec![
                QuestionOrderInput {
                    question_id: id1.clone(),
                    order_index: 2,
                },
                QuestionOrderInput {
                    question_id: id2.clone(),
                    order_index: 1,
                },
            ],
        };

        let ordered = svc
            .reorder_questions(&teacher(), "quiz-1", request)
            .await
            .expect("reorder should succeed");

        assert_eq!(ordered[0].id, id2);
        assert_eq!(ordered[1].id, id1);
    }

    #[tokio::test]
    async fn unpublish_requires_capability_flag() {
        let svc = service(
            MockQuizRepository::new(),
            MockClassRepository::new(),
            CapabilityPolicy::default(),
        );

        let result = svc.unpublish_quiz(&teacher(), "quiz-1").await;
        assert!(
            matches!(result, Err(AppError::BadRequest(ref msg)) if msg.contains("not enabled"))
        );
    }

    #[tokio::test]
    async fn unpublish_works_when_enabled() {
        let mut published = draft_quiz();
        published.is_published = true;
        published.questions.push(mc_question(1));
        let quiz_id = published.id.clone();

        let mut unpublished = published.clone();
        unpublished.is_published = false;

        let mut quiz_repo = MockQuizRepository::new();
        let mut responses = vec![published, unpublished].into_iter();
        quiz_repo
            .expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(responses.next()));
        quiz_repo
            .expect_mark_unpublished()
            .times(1)
            .returning(|_| Ok(true));

        let svc = service(
            quiz_repo,
            MockClassRepository::new(),
            CapabilityPolicy {
                allow_unpublish: true,
                ..CapabilityPolicy::default()
            },
        );

        let quiz = svc
            .unpublish_quiz(&teacher(), &quiz_id)
            .await
            .expect("unpublish should succeed");
        assert!(!quiz.is_published);
    }

    #[tokio::test]
    async fn taking_view_requires_enrollment() {
        let mut quiz_repo = MockQuizRepository::new();
        quiz_repo.expect_find_by_id().returning(|_| {
            let mut quiz = draft_quiz();
            quiz.is_published = true;
            quiz.questions.push(mc_question(1));
            Ok(Some(quiz))
        });

        let mut class_repo = MockClassRepository::new();
        class_repo.expect_is_enrolled().returning(|_, _| Ok(false));

        let svc = service(quiz_repo, class_repo, CapabilityPolicy::default());

        let result = svc.quiz_for_taking(&student(), "quiz-1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
