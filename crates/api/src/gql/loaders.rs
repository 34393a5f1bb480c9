use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use infra::{db::Db, repos::users};
use uuid::Uuid;

use super::types::User;

/// Resolves `Club.creator` for a whole page of clubs with one `users` query.
#[derive(Clone)]
pub struct CreatorLoader {
    pool: Db,
}

impl CreatorLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for CreatorLoader {
    type Value = User;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = Result<HashMap<Uuid, User>, Self::Error>> + Send {
        let pool = self.pool.clone();
        let ids = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = users::list_by_ids(&pool, &ids).await.map_err(Arc::new)?;

            Ok(rows.into_iter().map(|row| (row.id, User::from(row))).collect())
        }
    }
}
