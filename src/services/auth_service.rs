use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{verify_password, JwtService},
    errors::{AppError, AppResult},
    models::dto::{
        request::LoginRequest,
        response::{LoginResponse, LoginUser},
    },
    repositories::UserRepository,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self { users, jwt_service }
    }

    /// Unknown users, deactivated users and wrong passwords all produce the same 401.
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let user = match self.users.find_by_username(&request.username).await? {
            Some(user) => user,
            None => {
                log::warn!("Login rejected for unknown user '{}'", request.username);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(request.password, user.password_hash.clone()).await? {
            log::warn!("Login rejected for '{}': wrong password", user.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let access_token = self.jwt_service.create_token(&user)?;
        log::info!("User '{}' logged in as {}", user.username, user.role);

        Ok(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            access_token,
            token_type: "bearer".to_string(),
            redirect_url: user.role.home_path().to_string(),
            user: LoginUser {
                id: user.id,
                nama: user.nama,
                role: user.role,
            },
        })
    }
}
