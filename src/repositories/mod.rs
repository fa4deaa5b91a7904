pub mod material_repository;
pub mod progress_repository;
pub mod question_repository;
pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod sub_material_repository;
pub mod user_repository;

pub use material_repository::{MaterialRepository, MongoMaterialRepository};
pub use progress_repository::{MongoProgressRepository, ProgressRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_attempt_repository::{
    AttemptTransaction, MongoAttemptTransaction, MongoQuizAttemptRepository, QuizAttemptRepository,
};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use sub_material_repository::{MongoSubMaterialRepository, SubMaterialRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
