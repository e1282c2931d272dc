pub mod class;
pub mod question;
pub mod quiz;
pub mod submission;

pub use class::ClassRecord;
pub use question::{Question, QuestionKind, QuestionOption};
pub use quiz::Quiz;
pub use submission::{Submission, SubmissionAnswer, SubmissionState};
