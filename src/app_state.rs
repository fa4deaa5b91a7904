use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MaterialRepository, MongoMaterialRepository, MongoProgressRepository,
        MongoQuestionRepository, MongoQuizAttemptRepository, MongoQuizRepository,
        MongoSubMaterialRepository, MongoUserRepository, ProgressRepository, QuestionRepository,
        QuizAttemptRepository, QuizRepository, SubMaterialRepository, UserRepository,
    },
    services::{
        AuthService, MaterialService, ProgressService, QuizAttemptService, QuizService,
        SubMaterialService, UploadService, UserService,
    },
};

/// Storage handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub materials: Arc<dyn MaterialRepository>,
    pub sub_materials: Arc<dyn SubMaterialRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub attempts: Arc<dyn QuizAttemptRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(db)),
            materials: Arc::new(MongoMaterialRepository::new(db)),
            sub_materials: Arc::new(MongoSubMaterialRepository::new(db)),
            progress: Arc::new(MongoProgressRepository::new(db)),
            quizzes: Arc::new(MongoQuizRepository::new(db)),
            questions: Arc::new(MongoQuestionRepository::new(db)),
            attempts: Arc::new(MongoQuizAttemptRepository::new(db)),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.users.ensure_indexes().await?;
        self.materials.ensure_indexes().await?;
        self.sub_materials.ensure_indexes().await?;
        self.progress.ensure_indexes().await?;
        self.quizzes.ensure_indexes().await?;
        self.questions.ensure_indexes().await?;
        self.attempts.ensure_indexes().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub material_service: Arc<MaterialService>,
    pub sub_material_service: Arc<SubMaterialService>,
    pub progress_service: Arc<ProgressService>,
    pub quiz_service: Arc<QuizService>,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
    /// Absent when running on injected repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let repositories = Repositories::mongo(&db);
        repositories.ensure_indexes().await?;

        let mut state = Self::from_repositories(config, repositories);
        if let Some(seed) = &state.config.seed_teacher {
            state.user_service.seed_teacher(seed).await?;
        }
        state.db = Some(db);

        Ok(state)
    }

    pub fn from_repositories(config: Config, repositories: Repositories) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));
        let uploads = Arc::new(UploadService::new(config.upload_dir.clone()));

        let progress_service = Arc::new(ProgressService::new(
            repositories.progress.clone(),
            repositories.sub_materials.clone(),
        ));

        Self {
            auth_service: Arc::new(AuthService::new(
                repositories.users.clone(),
                jwt_service.clone(),
            )),
            user_service: Arc::new(UserService::new(repositories.users.clone())),
            material_service: Arc::new(MaterialService::new(
                repositories.materials.clone(),
                repositories.sub_materials.clone(),
                repositories.progress.clone(),
            )),
            sub_material_service: Arc::new(SubMaterialService::new(
                repositories.materials.clone(),
                repositories.sub_materials.clone(),
                uploads.clone(),
            )),
            quiz_service: Arc::new(QuizService::new(
                repositories.quizzes.clone(),
                repositories.questions.clone(),
                progress_service.clone(),
                uploads,
            )),
            quiz_attempt_service: Arc::new(QuizAttemptService::new(
                repositories.quizzes.clone(),
                repositories.attempts.clone(),
            )),
            progress_service,
            jwt_service,
            config: Arc::new(config),
            db: None,
        }
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
