use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, to_document},
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::Quiz};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn list_by_teacher(
        &self,
        teacher_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)>;
    async fn list_published_by_class(
        &self,
        class_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)>;
    /// `$set` of everything except the question array and the
    /// publication flag, so a metadata edit can never clobber a
    /// concurrent question mutation or publish.
    async fn update_metadata(&self, quiz: &Quiz) -> AppResult<bool>;
    /// Full replace, guarded on the quiz still being a draft. Question
    /// mutations go through this; a concurrent publish makes it a no-op.
    async fn replace_draft(&self, quiz: &Quiz) -> AppResult<bool>;
    /// Draft -> published, refused at the storage level when the quiz
    /// has no questions. Returns false when nothing matched.
    async fn mark_published(&self, id: &str) -> AppResult<bool>;
    async fn mark_unpublished(&self, id: &str) -> AppResult<bool>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let teacher_index = IndexModel::builder()
            .keys(doc! { "created_by": 1 })
            .options(IndexOptions::builder().name("created_by".to_string()).build())
            .build();

        let class_index = IndexModel::builder()
            .keys(doc! { "class_id": 1, "is_published": 1 })
            .options(
                IndexOptions::builder()
                    .name("class_published".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(teacher_index).await?;
        self.collection.create_index(class_index).await?;

        Ok(())
    }

    async fn paginated(
        &self,
        filter: mongodb::bson::Document,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let find_options = FindOptions::builder()
            .skip(Some(offset as u64))
            .limit(Some(limit))
            .build();

        let cursor = self
            .collection
            .find(filter)
            .with_options(find_options)
            .await?;
        let items: Vec<Quiz> = cursor.try_collect().await?;

        Ok((items, total))
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn list_by_teacher(
        &self,
        teacher_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        self.paginated(doc! { "created_by": teacher_id }, offset, limit)
            .await
    }

    async fn list_published_by_class(
        &self,
        class_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        self.paginated(
            doc! { "class_id": class_id, "is_published": true },
            offset,
            limit,
        )
        .await
    }

    async fn update_metadata(&self, quiz: &Quiz) -> AppResult<bool> {
        let mut fields = to_document(quiz)?;
        fields.remove("questions");
        fields.remove("is_published");
        fields.remove("id");

        let result = self
            .collection
            .update_one(doc! { "id": &quiz.id }, doc! { "$set": fields })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn replace_draft(&self, quiz: &Quiz) -> AppResult<bool> {
        let result = self
            .collection
            .replace_one(doc! { "id": &quiz.id, "is_published": false }, quiz)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn mark_published(&self, id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! {
                    "id": id,
                    "is_published": false,
                    "questions.0": { "$exists": true },
                },
                doc! { "$set": {
                    "is_published": true,
                    "modified_at": to_bson(&Utc::now())?,
                } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn mark_unpublished(&self, id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "is_published": true },
                doc! { "$set": {
                    "is_published": false,
                    "modified_at": to_bson(&Utc::now())?,
                } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
