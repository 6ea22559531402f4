use crate::model::{
    id::{UserId, VenueId},
    list::PaginatedList,
    venue::{
        event::{CreateVenue, UpdateVenue},
        Venue, VenueListOptions,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, event: CreateVenue) -> AppResult<VenueId>;
    /// 公開中 (Active) の会場のみを返す
    async fn find_active(&self, options: VenueListOptions) -> AppResult<PaginatedList<Venue>>;
    async fn find_by_id(&self, venue_id: VenueId) -> AppResult<Option<Venue>>;
    async fn find_by_owner(&self, user_id: UserId) -> AppResult<Vec<Venue>>;
    async fn update(&self, event: UpdateVenue) -> AppResult<()>;
}
