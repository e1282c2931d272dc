pub mod class_repository;
pub mod quiz_repository;
pub mod submission_repository;

pub use class_repository::{ClassRepository, MongoClassRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use submission_repository::{MongoSubmissionRepository, SubmissionRepository};

#[cfg(test)]
pub use class_repository::MockClassRepository;
#[cfg(test)]
pub use quiz_repository::MockQuizRepository;
#[cfg(test)]
pub use submission_repository::MockSubmissionRepository;
