use std::env;

use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};

use super::loaders::CreatorLoader;
use super::{MutationRoot, QueryRoot};
use crate::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

const MAX_DEPTH: usize = 10;
const MAX_COMPLEXITY: usize = 200;

/// Build the club schema. Resolvers reach the pool and auth services through
/// `ctx.data::<AppState>()`; the session arrives per request as `Claims`.
pub fn build_schema(state: AppState) -> AppSchema {
    let creators = DataLoader::new(CreatorLoader::new(state.db.clone()), tokio::spawn);

    let introspection = env::var("GQL_INTROSPECTION")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state)
    .data(creators)
    .limit_depth(MAX_DEPTH)
    .limit_complexity(MAX_COMPLEXITY);

    if introspection {
        builder.finish()
    } else {
        builder.disable_introspection().finish()
    }
}
