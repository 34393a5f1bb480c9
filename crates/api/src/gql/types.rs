use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};

use infra::models::UserRow;

/// Public view of an account; the password hash never leaves the store layer.
#[derive(SimpleObject, Clone, Debug)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into(),
            email: row.email,
            created_at: row.created_at,
        }
    }
}
