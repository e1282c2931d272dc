//! In-memory repository implementations shared by the integration
//! tests. They mirror the storage contracts the Mongo implementations
//! rely on: the unique (quiz_id, student_id) index and the conditional
//! draft/in-progress/ungraded writes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizly_server::{
    errors::{AppError, AppResult},
    models::domain::{ClassRecord, Quiz, Submission},
    repositories::{ClassRepository, QuizRepository, SubmissionRepository},
};

fn paginate<T: Clone>(items: Vec<T>, offset: i64, limit: i64) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let start = offset.max(0) as usize;
    let end = (start + limit.max(0) as usize).min(items.len());

    let page = if start >= items.len() {
        vec![]
    } else {
        items[start..end].to_vec()
    };

    (page, total)
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }

    async fn list_by_teacher(
        &self,
        teacher_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes
            .values()
            .filter(|q| q.created_by == teacher_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(paginate(items, offset, limit))
    }

    async fn list_published_by_class(
        &self,
        class_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes
            .values()
            .filter(|q| q.class_id == class_id && q.is_published)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(paginate(items, offset, limit))
    }

    async fn update_metadata(&self, quiz: &Quiz) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        let Some(existing) = quizzes.get_mut(&quiz.id) else {
            return Ok(false);
        };

        // Everything except the question array and the publication flag.
        let questions = existing.questions.clone();
        let is_published = existing.is_published;
        *existing = quiz.clone();
        existing.questions = questions;
        existing.is_published = is_published;
        Ok(true)
    }

    async fn replace_draft(&self, quiz: &Quiz) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        match quizzes.get_mut(&quiz.id) {
            Some(existing) if !existing.is_published => {
                *existing = quiz.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_published(&self, id: &str) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        match quizzes.get_mut(id) {
            Some(existing) if !existing.is_published && !existing.questions.is_empty() => {
                existing.is_published = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_unpublished(&self, id: &str) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        match quizzes.get_mut(id) {
            Some(existing) if existing.is_published => {
                existing.is_published = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemorySubmissionRepository {
    submissions: Arc<RwLock<HashMap<String, Submission>>>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        let mut submissions = self.submissions.write().await;
        if submissions.contains_key(&submission.id) {
            return Err(AppError::AlreadyExists(format!(
                "Submission with id '{}' already exists",
                submission.id
            )));
        }
        // The unique (quiz_id, student_id) index.
        if submissions
            .values()
            .any(|s| s.quiz_id == submission.quiz_id && s.student_id == submission.student_id)
        {
            return Err(AppError::AlreadyExists(format!(
                "Attempt at quiz '{}' by student '{}' already exists",
                submission.quiz_id, submission.student_id
            )));
        }
        submissions.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions.get(id).cloned())
    }

    async fn find_by_quiz_and_student(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .values()
            .find(|s| s.quiz_id == quiz_id && s.student_id == student_id)
            .cloned())
    }

    async fn list_by_quiz(
        &self,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Submission>, i64)> {
        let submissions = self.submissions.read().await;
        let mut items: Vec<_> = submissions
            .values()
            .filter(|s| s.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(paginate(items, offset, limit))
    }

    async fn replace_if_in_progress(&self, submission: &Submission) -> AppResult<bool> {
        let mut submissions = self.submissions.write().await;
        match submissions.get_mut(&submission.id) {
            Some(existing) if !existing.is_complete => {
                *existing = submission.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn replace_if_ungraded(&self, submission: &Submission) -> AppResult<bool> {
        let mut submissions = self.submissions.write().await;
        match submissions.get_mut(&submission.id) {
            Some(existing) if existing.is_complete && existing.total_score.is_none() => {
                *existing = submission.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn replace(&self, submission: &Submission) -> AppResult<bool> {
        let mut submissions = self.submissions.write().await;
        match submissions.get_mut(&submission.id) {
            Some(existing) => {
                *existing = submission.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let mut submissions = self.submissions.write().await;
        let before = submissions.len();
        submissions.retain(|_, s| s.quiz_id != quiz_id);
        Ok((before - submissions.len()) as u64)
    }
}

pub struct InMemoryClassRepository {
    classes: Arc<RwLock<HashMap<String, ClassRecord>>>,
}

impl InMemoryClassRepository {
    pub fn new() -> Self {
        Self {
            classes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn seed(&self, class: ClassRecord) {
        let mut classes = self.classes.write().await;
        classes.insert(class.id.clone(), class);
    }
}

#[async_trait]
impl ClassRepository for InMemoryClassRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<ClassRecord>> {
        let classes = self.classes.read().await;
        Ok(classes.get(id).cloned())
    }

    async fn is_enrolled(&self, class_id: &str, student_id: &str) -> AppResult<bool> {
        let classes = self.classes.read().await;
        Ok(classes
            .get(class_id)
            .map(|c| c.has_student(student_id))
            .unwrap_or(false))
    }
}

/// Class "class-1" owned by teacher-1 with student-1 enrolled.
pub fn default_class() -> ClassRecord {
    ClassRecord {
        id: "class-1".to_string(),
        name: "Year 10".to_string(),
        teacher_id: "teacher-1".to_string(),
        student_ids: vec!["student-1".to_string()],
        created_at: None,
    }
}
