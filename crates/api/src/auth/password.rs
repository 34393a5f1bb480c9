use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
    }

    /// Runs bcrypt on the blocking pool.
    pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AppError> {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?
    }

    /// Check a sign-in attempt. With no stored hash (unknown email) the
    /// password is still hashed once, so both misses cost the same bcrypt work.
    pub async fn check_credentials_blocking(
        password: String,
        stored_hash: Option<String>,
    ) -> Result<bool, AppError> {
        match stored_hash {
            Some(hash) => Self::verify_password_blocking(password, hash).await,
            None => {
                Self::hash_password_blocking(password).await?;
                Ok(false)
            }
        }
    }
}
