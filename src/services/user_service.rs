use std::sync::Arc;

use secrecy::ExposeSecret;
use validator::Validate;

use crate::{
    auth::hash_password,
    config::SeedTeacher,
    errors::{AppError, AppResult},
    models::{
        domain::{Role, User},
        dto::{
            request::{CreateUserRequest, UpdateUserRequest},
            response::UserDto,
        },
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    async fn find_user(&self, id: &str) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }

    async fn ensure_username_free(&self, username: &str, exclude_id: Option<String>) -> AppResult<()> {
        if self.repository.username_taken(username, exclude_id).await? {
            log::warn!("Username '{}' is already taken", username);
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        Ok(())
    }

    pub async fn list_users(&self, role: Option<Role>) -> AppResult<Vec<UserDto>> {
        let users = self.repository.find_all(role).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn get_user(&self, id: &str) -> AppResult<UserDto> {
        Ok(self.find_user(id).await?.into())
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserDto> {
        request.validate()?;
        self.ensure_username_free(&request.username, None).await?;

        let password_hash = hash_password(request.password).await?;
        let user = User::new(&request.nama, &request.username, &password_hash, request.role);
        let created = self.repository.create(user).await?;

        log::info!("Created {} account '{}'", created.role, created.username);
        Ok(created.into())
    }

    /// Partial update. Keeping one's own username is not a conflict.
    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> AppResult<UserDto> {
        request.validate()?;
        let mut user = self.find_user(id).await?;

        if let Some(username) = request.username {
            if username != user.username {
                self.ensure_username_free(&username, Some(user.id.clone()))
                    .await?;
                user.username = username;
            }
        }
        if let Some(nama) = request.nama {
            user.nama = nama;
        }
        if let Some(password) = request.password {
            user.password_hash = hash_password(password).await?;
        }

        user.touch();
        let updated = self.repository.update(user).await?;
        log::info!("Updated user '{}'", updated.id);
        Ok(updated.into())
    }

    /// False once the account is deactivated or gone.
    pub async fn is_active(&self, id: &str) -> AppResult<bool> {
        Ok(self.repository.find_by_id(id).await?.is_some())
    }

    /// Accounts are never removed; deactivation keeps attempt history intact.
    pub async fn deactivate_user(&self, id: &str) -> AppResult<()> {
        let mut user = self.find_user(id).await?;
        user.is_active = false;
        user.touch();
        self.repository.update(user).await?;

        log::info!("Deactivated user '{}'", id);
        Ok(())
    }

    pub async fn seed_teacher(&self, seed: &SeedTeacher) -> AppResult<()> {
        if self.repository.username_taken(&seed.username, None).await? {
            log::debug!("Seed teacher '{}' already present", seed.username);
            return Ok(());
        }

        let password_hash = hash_password(seed.password.expose_secret().to_string()).await?;
        let user = User::new(&seed.nama, &seed.username, &password_hash, Role::Teacher);
        self.repository.create(user).await?;

        log::info!("Seeded teacher account '{}'", seed.username);
        Ok(())
    }
}
