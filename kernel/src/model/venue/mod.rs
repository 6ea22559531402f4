use crate::model::{
    id::{UserId, VenueId},
    user::ListingOwner,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

pub mod event;

/// venue_listings.status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
pub enum VenueStatus {
    Pending,
    Active,
    Rejected,
    Inactive,
}

impl VenueStatus {
    /// オーナー自身が切り替えられるのは承認後の Active / Inactive のみ
    pub fn owner_can_switch(self, next: VenueStatus) -> bool {
        matches!(
            (self, next),
            (VenueStatus::Active, VenueStatus::Inactive)
                | (VenueStatus::Inactive, VenueStatus::Active)
                | (VenueStatus::Active, VenueStatus::Active)
                | (VenueStatus::Inactive, VenueStatus::Inactive)
        )
    }
}

#[derive(Debug)]
pub struct Venue {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub address: String,
    pub capacity: i32,
    pub amenities: String,
    pub pricing: String,
    pub status: VenueStatus,
    pub owner: ListingOwner,
    pub created_at: DateTime<Utc>,
}

impl Venue {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner.owner_id == user_id
    }

    pub fn is_bookable(&self) -> bool {
        self.status == VenueStatus::Active
    }
}

#[derive(Debug)]
pub struct VenueListOptions {
    pub min_capacity: Option<i32>,
    pub limit: i64,
    pub offset: i64,
}
