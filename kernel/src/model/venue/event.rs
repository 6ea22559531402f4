use crate::model::id::{UserId, VenueId};

use super::VenueStatus;

pub struct CreateVenue {
    pub user_id: UserId,
    pub venue_name: String,
    pub address: String,
    pub capacity: i32,
    pub amenities: String,
    pub pricing: String,
}

#[derive(Debug)]
pub struct UpdateVenue {
    pub venue_id: VenueId,
    pub requested_user: UserId,
    pub venue_name: Option<String>,
    pub address: Option<String>,
    pub capacity: Option<i32>,
    pub amenities: Option<String>,
    pub pricing: Option<String>,
    pub status: Option<VenueStatus>,
}
