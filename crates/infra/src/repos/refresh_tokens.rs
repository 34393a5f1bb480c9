use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::RefreshTokenRow;

const TOKEN_COLUMNS: &str =
    "id, token_hash, user_id, family_id, expires_at, revoked_at, created_at";

#[derive(Debug, Clone)]
pub struct CreateRefreshTokenData {
    pub token_hash: String,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateRefreshTokenData,
) -> SqlxResult<RefreshTokenRow> {
    sqlx::query_as::<_, RefreshTokenRow>(&format!(
        r#"
        INSERT INTO refresh_tokens (token_hash, user_id, family_id, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING {TOKEN_COLUMNS}
        "#
    ))
    .bind(&data.token_hash)
    .bind(data.user_id)
    .bind(data.family_id)
    .bind(data.expires_at)
    .fetch_one(executor)
    .await
}

/// Token by hash in any state (active, expired or revoked).
pub async fn find_by_hash<'e>(
    executor: impl PgExecutor<'e>,
    token_hash: &str,
) -> SqlxResult<Option<RefreshTokenRow>> {
    sqlx::query_as::<_, RefreshTokenRow>(&format!(
        "SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE token_hash = $1"
    ))
    .bind(token_hash)
    .fetch_optional(executor)
    .await
}

/// Mark one token used. Returns false when it was already revoked, so two
/// refreshes racing on the same token cannot both rotate it.
pub async fn revoke<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Revoke every live token descended from the same sign-in.
pub async fn revoke_family<'e>(executor: impl PgExecutor<'e>, family_id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked_at = NOW() WHERE family_id = $1 AND revoked_at IS NULL",
    )
    .bind(family_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
