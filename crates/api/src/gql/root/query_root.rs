use async_graphql::MergedObject;

use crate::gql::domains::auth::AuthQuery;
use crate::gql::domains::clubs::ClubQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(AuthQuery, ClubQuery);
