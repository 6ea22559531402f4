use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{UserId, VenueId},
    venue::{
        event::{CreateVenue, UpdateVenue},
        Venue, VenueListOptions, VenueStatus,
    },
};
use serde::{Deserialize, Serialize};

use super::{default_limit, user::ListingOwnerResponse};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueRequest {
    #[garde(length(min = 1, max = 200))]
    venue_name: String,
    #[garde(length(min = 1))]
    address: String,
    #[garde(range(min = 1))]
    capacity: i32,
    #[garde(skip)]
    #[serde(default)]
    amenities: String,
    #[garde(skip)]
    #[serde(default)]
    pricing: String,
}

#[derive(new)]
pub struct CreateVenueRequestWithUserId(UserId, CreateVenueRequest);
impl From<CreateVenueRequestWithUserId> for CreateVenue {
    fn from(value: CreateVenueRequestWithUserId) -> Self {
        let CreateVenueRequestWithUserId(
            user_id,
            CreateVenueRequest {
                venue_name,
                address,
                capacity,
                amenities,
                pricing,
            },
        ) = value;
        Self {
            user_id,
            venue_name,
            address,
            capacity,
            amenities,
            pricing,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenueRequest {
    #[garde(length(min = 1, max = 200))]
    venue_name: Option<String>,
    #[garde(length(min = 1))]
    address: Option<String>,
    #[garde(range(min = 1))]
    capacity: Option<i32>,
    #[garde(skip)]
    amenities: Option<String>,
    #[garde(skip)]
    pricing: Option<String>,
    #[garde(skip)]
    pub status: Option<VenueStatus>,
}

#[derive(new)]
pub struct UpdateVenueRequestWithIds(VenueId, UserId, UpdateVenueRequest);
impl From<UpdateVenueRequestWithIds> for UpdateVenue {
    fn from(value: UpdateVenueRequestWithIds) -> Self {
        let UpdateVenueRequestWithIds(
            venue_id,
            requested_user,
            UpdateVenueRequest {
                venue_name,
                address,
                capacity,
                amenities,
                pricing,
                status,
            },
        ) = value;
        Self {
            venue_id,
            requested_user,
            venue_name,
            address,
            capacity,
            amenities,
            pricing,
            status,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VenueListQuery {
    #[garde(range(min = 1))]
    pub min_capacity: Option<i32>,
    #[garde(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

impl From<VenueListQuery> for VenueListOptions {
    fn from(value: VenueListQuery) -> Self {
        let VenueListQuery {
            min_capacity,
            limit,
            offset,
        } = value;
        Self {
            min_capacity,
            limit,
            offset,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueResponse {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub address: String,
    pub capacity: i32,
    pub amenities: String,
    pub pricing: String,
    pub status: VenueStatus,
    pub owner: ListingOwnerResponse,
    pub created_at: DateTime<Utc>,
}

impl From<Venue> for VenueResponse {
    fn from(value: Venue) -> Self {
        let Venue {
            venue_id,
            venue_name,
            address,
            capacity,
            amenities,
            pricing,
            status,
            owner,
            created_at,
        } = value;
        Self {
            venue_id,
            venue_name,
            address,
            capacity,
            amenities,
            pricing,
            status,
            owner: owner.into(),
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVenueResponse {
    pub venue_id: VenueId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenuesResponse {
    pub items: Vec<VenueResponse>,
}

impl From<Vec<Venue>> for VenuesResponse {
    fn from(value: Vec<Venue>) -> Self {
        Self {
            items: value.into_iter().map(VenueResponse::from).collect(),
        }
    }
}
