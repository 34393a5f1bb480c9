use async_graphql::Context;
use infra::club_interaction::compute_view_flags;
use infra::models::ClubRow;
use uuid::Uuid;

use crate::auth::Claims;
use crate::gql::error::GqlError;

/// The viewer's uid, or `None` when the request carries no session.
pub fn current_user_id(ctx: &Context<'_>) -> Result<Option<Uuid>, GqlError> {
    match ctx.data_opt::<Claims>() {
        Some(claims) => Ok(Some(claims.user_id()?)),
        None => Ok(None),
    }
}

/// The viewer's uid; fails when logged out.
pub fn require_user(ctx: &Context<'_>) -> Result<Uuid, GqlError> {
    current_user_id(ctx)?.ok_or_else(|| {
        GqlError::Unauthenticated("You must be logged in to perform this action".to_string())
    })
}

/// Only the creator may edit or delete a club.
pub fn require_creator(club: &ClubRow, user_id: Uuid) -> Result<(), GqlError> {
    if compute_view_flags(club, Some(user_id)).is_creator {
        Ok(())
    } else {
        Err(GqlError::Forbidden(
            "Access denied: only the club's creator can change it".to_string(),
        ))
    }
}
