use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::ClassRecord};

/// Read-only window into the class collaborator: ownership and
/// enrollment lookups, nothing else.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<ClassRecord>>;
    async fn is_enrolled(&self, class_id: &str, student_id: &str) -> AppResult<bool>;
}

pub struct MongoClassRepository {
    collection: Collection<ClassRecord>,
}

impl MongoClassRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("classes");
        Self { collection }
    }
}

#[async_trait]
impl ClassRepository for MongoClassRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<ClassRecord>> {
        let class = self.collection.find_one(doc! { "id": id }).await?;
        Ok(class)
    }

    async fn is_enrolled(&self, class_id: &str, student_id: &str) -> AppResult<bool> {
        let class = self
            .collection
            .find_one(doc! { "id": class_id, "student_ids": student_id })
            .await?;
        Ok(class.is_some())
    }
}
