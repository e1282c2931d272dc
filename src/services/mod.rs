pub mod quiz_service;
pub mod scoring;
pub mod submission_service;

pub use quiz_service::QuizService;
pub use submission_service::SubmissionService;
