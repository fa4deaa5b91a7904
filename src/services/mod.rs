pub mod auth_service;
pub mod material_service;
pub mod progress_service;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod sub_material_service;
pub mod upload_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use material_service::MaterialService;
pub use progress_service::ProgressService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::QuizService;
pub use sub_material_service::SubMaterialService;
pub use upload_service::{UploadCategory, UploadService};
pub use user_service::UserService;
