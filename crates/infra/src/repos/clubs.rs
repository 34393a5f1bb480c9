use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::ClubRow;
use crate::pagination::LimitOffset;

const CLUB_COLUMNS: &str = "id, title, description, first_player, second_player, third_player, \
     image_url, creator, people_liked, likes, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateClubData {
    pub title: String,
    pub description: String,
    pub first_player: String,
    pub second_player: String,
    pub third_player: String,
    pub image_url: String,
    pub creator: Uuid,
}

/// Editable fields only. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateClubData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub first_player: Option<String>,
    pub second_player: Option<String>,
    pub third_player: Option<String>,
    pub image_url: Option<String>,
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    page: Option<LimitOffset>,
) -> SqlxResult<Vec<ClubRow>> {
    let page = page.unwrap_or_default();

    sqlx::query_as::<_, ClubRow>(&format!(
        r#"
        SELECT {CLUB_COLUMNS}
        FROM clubs
        ORDER BY created_at DESC, id
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<ClubRow>> {
    sqlx::query_as::<_, ClubRow>(&format!(
        r#"
        SELECT {CLUB_COLUMNS}
        FROM clubs
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateClubData) -> SqlxResult<ClubRow> {
    sqlx::query_as::<_, ClubRow>(&format!(
        r#"
        INSERT INTO clubs (title, description, first_player, second_player, third_player, image_url, creator)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {CLUB_COLUMNS}
        "#
    ))
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.first_player)
    .bind(&data.second_player)
    .bind(&data.third_player)
    .bind(&data.image_url)
    .bind(data.creator)
    .fetch_one(executor)
    .await
}

/// Per-field update; `creator`, `likes` and `people_liked` are never written here.
pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateClubData,
) -> SqlxResult<Option<ClubRow>> {
    sqlx::query_as::<_, ClubRow>(&format!(
        r#"
        UPDATE clubs
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            first_player = COALESCE($4, first_player),
            second_player = COALESCE($5, second_player),
            third_player = COALESCE($6, third_player),
            image_url = COALESCE($7, image_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {CLUB_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.first_player)
    .bind(&data.second_player)
    .bind(&data.third_player)
    .bind(&data.image_url)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM clubs WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Add or remove `user_id` from `people_liked` in one statement.
///
/// Every `SET` expression reads the same (current) row version, so the array
/// and the counter move together. Concurrent toggles serialize on the row lock
/// and the later one re-evaluates against the committed array.
pub async fn toggle_like<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    user_id: Uuid,
) -> SqlxResult<Option<ClubRow>> {
    sqlx::query_as::<_, ClubRow>(&format!(
        r#"
        UPDATE clubs
        SET people_liked = CASE
                WHEN $2::uuid = ANY(people_liked) THEN array_remove(people_liked, $2::uuid)
                ELSE array_append(people_liked, $2::uuid)
            END,
            likes = CASE
                WHEN $2::uuid = ANY(people_liked) THEN likes - 1
                ELSE likes + 1
            END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {CLUB_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Case-insensitive substring match on `title`, folded by Postgres on both
/// sides. `%`, `_` and `\` in `text` match literally.
pub async fn search_by_title<'e>(
    executor: impl PgExecutor<'e>,
    text: &str,
    page: Option<LimitOffset>,
) -> SqlxResult<Vec<ClubRow>> {
    let page = page.unwrap_or_default();
    let pattern = format!("%{}%", escape_like(text));

    sqlx::query_as::<_, ClubRow>(&format!(
        r#"
        SELECT {CLUB_COLUMNS}
        FROM clubs
        WHERE title ILIKE $1 ESCAPE '\'
        ORDER BY title ASC, id
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(pattern)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

/// Clubs ranked by likes, ties broken alphabetically.
pub async fn standings<'e>(executor: impl PgExecutor<'e>, limit: i64) -> SqlxResult<Vec<ClubRow>> {
    sqlx::query_as::<_, ClubRow>(&format!(
        r#"
        SELECT {CLUB_COLUMNS}
        FROM clubs
        ORDER BY likes DESC, title ASC, id
        LIMIT $1
        "#
    ))
    .bind(limit)
    .fetch_all(executor)
    .await
}

fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
