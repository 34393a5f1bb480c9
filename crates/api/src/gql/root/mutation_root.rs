use async_graphql::MergedObject;

use crate::gql::domains::auth::AuthMutation;
use crate::gql::domains::clubs::ClubMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutation, ClubMutation);
