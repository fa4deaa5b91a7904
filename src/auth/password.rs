use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Hashes a password into a PHC string. Runs on the blocking pool.
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Password hashing task failed: {}", e)))?
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = match PasswordHash::new(&password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Password verification task failed: {}", e)))
}
