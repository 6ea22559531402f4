use chrono::{DateTime, Utc};
use kernel::model::{
    id::{UserId, VenueId},
    user::ListingOwner,
    venue::Venue,
};
use shared::error::AppError;

use super::parse_stored;

pub struct VenueRow {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub address: String,
    pub capacity: i32,
    pub amenities: String,
    pub pricing: String,
    pub status: String,
    pub owned_by: UserId,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<VenueRow> for Venue {
    type Error = AppError;

    fn try_from(value: VenueRow) -> Result<Self, Self::Error> {
        let VenueRow {
            venue_id,
            venue_name,
            address,
            capacity,
            amenities,
            pricing,
            status,
            owned_by,
            owner_name,
            created_at,
        } = value;
        Ok(Venue {
            venue_id,
            venue_name,
            address,
            capacity,
            amenities,
            pricing,
            status: parse_stored("venue_listings.status", &status)?,
            owner: ListingOwner {
                owner_id: owned_by,
                owner_name,
            },
            created_at,
        })
    }
}
