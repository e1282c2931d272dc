use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Submission,
};

const DUPLICATE_KEY_CODE: i32 = 11000;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Insert a fresh attempt. The unique (quiz_id, student_id) index
    /// makes this fail with `AlreadyExists` when the student already
    /// has an attempt, which the caller resolves with a lookup.
    async fn create(&self, submission: Submission) -> AppResult<Submission>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Submission>>;
    async fn find_by_quiz_and_student(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>>;
    async fn list_by_quiz(
        &self,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Submission>, i64)>;
    /// Replace guarded on the attempt still being in progress.
    async fn replace_if_in_progress(&self, submission: &Submission) -> AppResult<bool>;
    /// Replace guarded on the attempt being complete but not yet graded.
    async fn replace_if_ungraded(&self, submission: &Submission) -> AppResult<bool>;
    /// Unconditional replace; only the re-grading path uses this.
    async fn replace(&self, submission: &Submission) -> AppResult<bool>;
    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<Submission>,
}

fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("submissions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for submissions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // One attempt per (quiz, student); closes the double-start race.
        let quiz_student_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("quiz_student_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_student_index).await?;

        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        match self.collection.insert_one(&submission).await {
            Ok(_) => Ok(submission),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::AlreadyExists(format!(
                "Attempt at quiz '{}' by student '{}' already exists",
                submission.quiz_id, submission.student_id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Submission>> {
        let submission = self.collection.find_one(doc! { "id": id }).await?;
        Ok(submission)
    }

    async fn find_by_quiz_and_student(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Submission>> {
        let submission = self
            .collection
            .find_one(doc! { "quiz_id": quiz_id, "student_id": student_id })
            .await?;
        Ok(submission)
    }

    async fn list_by_quiz(
        &self,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Submission>, i64)> {
        let filter = doc! { "quiz_id": quiz_id };

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let find_options = FindOptions::builder()
            .skip(Some(offset as u64))
            .limit(Some(limit))
            .sort(doc! { "started_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(filter)
            .with_options(find_options)
            .await?;
        let items: Vec<Submission> = cursor.try_collect().await?;

        Ok((items, total))
    }

    async fn replace_if_in_progress(&self, submission: &Submission) -> AppResult<bool> {
        let result = self
            .collection
            .replace_one(
                doc! { "id": &submission.id, "is_complete": false },
                submission,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn replace_if_ungraded(&self, submission: &Submission) -> AppResult<bool> {
        // total_score is only ever written by grading, so "complete with
        // no total_score" identifies the gradeable window.
        let result = self
            .collection
            .replace_one(
                doc! {
                    "id": &submission.id,
                    "is_complete": true,
                    "total_score": null,
                },
                submission,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn replace(&self, submission: &Submission) -> AppResult<bool> {
        let result = self
            .collection
            .replace_one(doc! { "id": &submission.id }, submission)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "quiz_id": quiz_id })
            .await?;
        Ok(result.deleted_count)
    }
}
