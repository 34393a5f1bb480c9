use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use infra::club_interaction::compute_view_flags;
use infra::models::ClubRow;
use infra::repos::{CreateClubData, UpdateClubData};

use crate::gql::error::{CodedResultExt, GqlError};
use crate::gql::loaders::CreatorLoader;
use crate::gql::types::User;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Club {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub first_player: String,
    pub second_player: String,
    pub third_player: String,
    pub image_url: String,
    pub creator_id: ID,
    pub people_liked: Vec<ID>,
    pub likes: i32,
    /// True when the viewer created this club.
    pub is_creator: bool,
    /// True when the viewer is among `peopleLiked`.
    pub has_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[graphql(skip)]
    pub creator_uuid: Uuid,
}

impl Club {
    /// Render a stored club for a specific viewer (`None` = logged out).
    pub fn for_viewer(row: ClubRow, viewer: Option<Uuid>) -> Self {
        let flags = compute_view_flags(&row, viewer);

        Self {
            id: row.id.into(),
            title: row.title,
            description: row.description,
            first_player: row.first_player,
            second_player: row.second_player,
            third_player: row.third_player,
            image_url: row.image_url,
            creator_id: row.creator.into(),
            people_liked: row.people_liked.into_iter().map(ID::from).collect(),
            likes: row.likes,
            is_creator: flags.is_creator,
            has_liked: flags.has_liked,
            created_at: row.created_at,
            updated_at: row.updated_at,
            creator_uuid: row.creator,
        }
    }
}

#[ComplexObject]
impl Club {
    async fn creator(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loader = ctx.data::<DataLoader<CreatorLoader>>()?;
        loader
            .load_one(self.creator_uuid)
            .await
            .map_err(|e| GqlError::Internal(format!("Failed to load creator: {e}")))
            .coded()
    }
}

#[derive(InputObject)]
pub struct CreateClubInput {
    pub title: String,
    pub description: String,
    pub first_player: String,
    pub second_player: String,
    pub third_player: String,
    pub image_url: String,
}

impl CreateClubInput {
    pub fn into_data(self, creator: Uuid) -> CreateClubData {
        CreateClubData {
            title: self.title,
            description: self.description,
            first_player: self.first_player,
            second_player: self.second_player,
            third_player: self.third_player,
            image_url: self.image_url,
            creator,
        }
    }
}

/// Omitted fields keep their stored value.
#[derive(InputObject, Default)]
pub struct UpdateClubInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub first_player: Option<String>,
    pub second_player: Option<String>,
    pub third_player: Option<String>,
    pub image_url: Option<String>,
}

impl From<UpdateClubInput> for UpdateClubData {
    fn from(input: UpdateClubInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            first_player: input.first_player,
            second_player: input.second_player,
            third_player: input.third_player,
            image_url: input.image_url,
        }
    }
}
