use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoClassRepository, MongoQuizRepository, MongoSubmissionRepository},
    services::{QuizService, SubmissionService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub submission_service: Arc<SubmissionService>,
    pub database: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let submission_repository = Arc::new(MongoSubmissionRepository::new(&db));
        submission_repository.ensure_indexes().await?;

        let class_repository = Arc::new(MongoClassRepository::new(&db));

        let quiz_service = Arc::new(QuizService::new(
            quiz_repository.clone(),
            class_repository.clone(),
            submission_repository.clone(),
            config.capabilities,
        ));
        let submission_service = Arc::new(SubmissionService::new(
            submission_repository,
            quiz_repository,
            class_repository,
            config.capabilities,
        ));

        Ok(Self {
            quiz_service,
            submission_service,
            database: db,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
