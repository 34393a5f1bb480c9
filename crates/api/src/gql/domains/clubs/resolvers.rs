use async_graphql::{Context, ErrorExtensions, Object, Result, ID};
use uuid::Uuid;

use infra::club_interaction::require_liker;
use infra::pagination::LimitOffset;
use infra::repos::clubs;

use crate::auth::permissions::{current_user_id, require_creator, require_user};
use crate::gql::error::{CodedResultExt, GqlError};
use crate::state::AppState;

use super::types::{Club, CreateClubInput, UpdateClubInput};

fn parse_club_id(id: &ID) -> Result<Uuid> {
    Uuid::parse_str(id.as_str()).coded()
}

// ── Queries ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ClubQuery;

#[Object]
impl ClubQuery {
    /// All clubs, newest first.
    async fn clubs(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<Club>> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_user_id(ctx).coded()?;

        let rows = clubs::list(&state.db, Some(LimitOffset::from_parts(limit, offset)))
            .await
            .coded()?;

        Ok(rows
            .into_iter()
            .map(|row| Club::for_viewer(row, viewer))
            .collect())
    }

    /// A single club, with `isCreator`/`hasLiked` computed for the viewer.
    async fn club(&self, ctx: &Context<'_>, id: ID) -> Result<Club> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_user_id(ctx).coded()?;
        let club_id = parse_club_id(&id)?;

        let row = clubs::get_by_id(&state.db, club_id)
            .await
            .coded()?
            .ok_or_else(|| GqlError::not_found("Club"))
            .coded()?;

        Ok(Club::for_viewer(row, viewer))
    }

    /// Case-insensitive title search.
    async fn search_clubs(
        &self,
        ctx: &Context<'_>,
        text: String,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<Club>> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_user_id(ctx).coded()?;

        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let rows = clubs::search_by_title(
            &state.db,
            text,
            Some(LimitOffset::from_parts(limit, offset)),
        )
        .await
        .coded()?;

        Ok(rows
            .into_iter()
            .map(|row| Club::for_viewer(row, viewer))
            .collect())
    }

    /// Clubs ranked by likes.
    async fn standings(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 20)] limit: i32,
    ) -> Result<Vec<Club>> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_user_id(ctx).coded()?;
        let page = LimitOffset::from_parts(Some(limit), None);

        let rows = clubs::standings(&state.db, page.limit).await.coded()?;

        Ok(rows
            .into_iter()
            .map(|row| Club::for_viewer(row, viewer))
            .collect())
    }
}

// ── Mutations ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ClubMutation;

#[Object]
impl ClubMutation {
    async fn create_club(&self, ctx: &Context<'_>, input: CreateClubInput) -> Result<Club> {
        let user_id = require_user(ctx).coded()?;
        let state = ctx.data::<AppState>()?;

        let row = clubs::create(&state.db, input.into_data(user_id))
            .await
            .coded()?;

        tracing::info!(club_id = %row.id, creator = %user_id, "Club created");

        Ok(Club::for_viewer(row, Some(user_id)))
    }

    /// Update the supplied fields only. Likes and the creator are untouched.
    async fn update_club(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateClubInput,
    ) -> Result<Club> {
        let user_id = require_user(ctx).coded()?;
        let club_id = parse_club_id(&id)?;
        let state = ctx.data::<AppState>()?;

        let existing = clubs::get_by_id(&state.db, club_id)
            .await
            .coded()?
            .ok_or_else(|| GqlError::not_found("Club"))
            .coded()?;
        require_creator(&existing, user_id).coded()?;

        let row = clubs::update(&state.db, club_id, input.into())
            .await
            .coded()?
            .ok_or_else(|| GqlError::not_found("Club"))
            .coded()?;

        Ok(Club::for_viewer(row, Some(user_id)))
    }

    /// Delete a club; returns its id.
    async fn delete_club(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        let user_id = require_user(ctx).coded()?;
        let club_id = parse_club_id(&id)?;
        let state = ctx.data::<AppState>()?;

        let existing = clubs::get_by_id(&state.db, club_id)
            .await
            .coded()?
            .ok_or_else(|| GqlError::not_found("Club"))
            .coded()?;
        require_creator(&existing, user_id).coded()?;

        if !clubs::delete(&state.db, club_id).await.coded()? {
            return Err(GqlError::not_found("Club").extend());
        }

        tracing::info!(club_id = %club_id, "Club deleted");

        Ok(id)
    }

    /// Like the club, or take the like back if the viewer already liked it.
    async fn toggle_like(&self, ctx: &Context<'_>, club_id: ID) -> Result<Club> {
        let user_id = require_liker(Some(require_user(ctx).coded()?)).coded()?;
        let club_id = parse_club_id(&club_id)?;
        let state = ctx.data::<AppState>()?;

        let row = clubs::toggle_like(&state.db, club_id, user_id)
            .await
            .coded()?
            .ok_or_else(|| GqlError::not_found("Club"))
            .coded()?;

        Ok(Club::for_viewer(row, Some(user_id)))
    }
}
