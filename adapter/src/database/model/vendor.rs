use chrono::{DateTime, Utc};
use kernel::model::{
    id::{UserId, VendorId},
    user::ListingOwner,
    vendor::Vendor,
};
use shared::error::AppError;

use super::parse_stored;

pub struct VendorRow {
    pub vendor_id: VendorId,
    pub business_name: String,
    pub category: String,
    pub description: String,
    pub pricing: String,
    pub status: String,
    pub owned_by: UserId,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<VendorRow> for Vendor {
    type Error = AppError;

    fn try_from(value: VendorRow) -> Result<Self, Self::Error> {
        let VendorRow {
            vendor_id,
            business_name,
            category,
            description,
            pricing,
            status,
            owned_by,
            owner_name,
            created_at,
        } = value;
        Ok(Vendor {
            vendor_id,
            business_name,
            category,
            description,
            pricing,
            status: parse_stored("event_service_providers.status", &status)?,
            owner: ListingOwner {
                owner_id: owned_by,
                owner_name,
            },
            created_at,
        })
    }
}
