pub mod material;
pub mod progress;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod user;
pub use material::{ContentCategory, Material, SubMaterial};
pub use progress::{CompletionCounts, Progress};
pub use quiz::Quiz;
pub use quiz_attempt::{AttemptSummary, QuizAttempt, QuizAttemptAnswer};
pub use quiz_question::{QuestionAnswer, QuizQuestion, ANSWER_OPTION_COUNT};
pub use user::{Role, User};
