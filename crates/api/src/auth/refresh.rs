use chrono::{Duration, Utc};
use rand::distr::Alphanumeric;
use rand::RngExt;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use infra::repos::{refresh_tokens, CreateRefreshTokenData};

pub struct RotateResult {
    pub user_id: Uuid,
    pub new_raw_token: String,
}

pub fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_raw_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

async fn store_token(
    pool: &PgPool,
    user_id: Uuid,
    family_id: Uuid,
    expiration_days: u64,
) -> Result<String, AppError> {
    let raw_token = generate_raw_token();

    refresh_tokens::create(
        pool,
        CreateRefreshTokenData {
            token_hash: hash_token(&raw_token),
            user_id,
            family_id,
            expires_at: Utc::now() + Duration::days(expiration_days as i64),
        },
    )
    .await?;

    Ok(raw_token)
}

/// Start a new token family for a fresh sign-in.
pub async fn create_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    expiration_days: u64,
) -> Result<String, AppError> {
    store_token(pool, user_id, Uuid::new_v4(), expiration_days).await
}

/// Exchange a refresh token for a new one in the same family.
///
/// Presenting a token that was already rotated away revokes the whole family.
pub async fn rotate_refresh_token(
    pool: &PgPool,
    raw_token: &str,
    expiration_days: u64,
) -> Result<RotateResult, AppError> {
    let invalid = || AppError::Unauthorized("Invalid or expired refresh token".to_string());

    let token_row = refresh_tokens::find_by_hash(pool, &hash_token(raw_token))
        .await?
        .ok_or_else(invalid)?;

    if token_row.is_revoked() {
        let revoked = refresh_tokens::revoke_family(pool, token_row.family_id).await?;
        tracing::warn!(
            family_id = %token_row.family_id,
            revoked,
            "Refresh token reuse detected, token family revoked"
        );
        return Err(invalid());
    }

    if token_row.is_expired_at(Utc::now()) {
        return Err(invalid());
    }

    // Losing this race means another request already rotated the token.
    if !refresh_tokens::revoke(pool, token_row.id).await? {
        return Err(invalid());
    }

    let new_raw_token =
        store_token(pool, token_row.user_id, token_row.family_id, expiration_days).await?;

    Ok(RotateResult {
        user_id: token_row.user_id,
        new_raw_token,
    })
}

/// Sign-out: revoke the family the token belongs to. Unknown tokens are ignored.
pub async fn revoke_by_token(pool: &PgPool, raw_token: &str) -> Result<(), AppError> {
    if let Some(token_row) = refresh_tokens::find_by_hash(pool, &hash_token(raw_token)).await? {
        refresh_tokens::revoke_family(pool, token_row.family_id).await?;
    }

    Ok(())
}
