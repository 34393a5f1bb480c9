use sqlx::Result;
use uuid::Uuid;

use crate::db::Db;
use crate::models::UserRow;

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub email: String,
    pub password_hash: String,
}

pub async fn get_by_id(pool: &Db, id: Uuid) -> Result<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn find_by_email(pool: &Db, email: &str) -> Result<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE LOWER(email) = LOWER($1)",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_by_ids(pool: &Db, ids: &[Uuid]) -> Result<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = ANY($1::uuid[])",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert a new account. The unique index on `LOWER(email)` rejects duplicates.
pub async fn create(pool: &Db, data: CreateUserData) -> Result<UserRow> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES ($1, $2)
        RETURNING id, email, password_hash, created_at, updated_at
        "#,
    )
    .bind(&data.email)
    .bind(&data.password_hash)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
