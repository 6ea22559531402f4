use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{UserId, VendorId},
    vendor::{
        event::{CreateVendor, UpdateVendor},
        ApprovalStatus, Vendor, VendorListOptions,
    },
};
use serde::{Deserialize, Serialize};

use super::{default_limit, user::ListingOwnerResponse};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorRequest {
    #[garde(length(min = 1, max = 200))]
    business_name: String,
    #[garde(length(min = 1, max = 100))]
    category: String,
    #[garde(skip)]
    #[serde(default)]
    description: String,
    #[garde(skip)]
    #[serde(default)]
    pricing: String,
}

#[derive(new)]
pub struct CreateVendorRequestWithUserId(UserId, CreateVendorRequest);
impl From<CreateVendorRequestWithUserId> for CreateVendor {
    fn from(value: CreateVendorRequestWithUserId) -> Self {
        let CreateVendorRequestWithUserId(
            user_id,
            CreateVendorRequest {
                business_name,
                category,
                description,
                pricing,
            },
        ) = value;
        Self {
            user_id,
            business_name,
            category,
            description,
            pricing,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVendorRequest {
    #[garde(length(min = 1, max = 200))]
    business_name: Option<String>,
    #[garde(length(min = 1, max = 100))]
    category: Option<String>,
    #[garde(skip)]
    description: Option<String>,
    #[garde(skip)]
    pricing: Option<String>,
}

#[derive(new)]
pub struct UpdateVendorRequestWithIds(VendorId, UserId, UpdateVendorRequest);
impl From<UpdateVendorRequestWithIds> for UpdateVendor {
    fn from(value: UpdateVendorRequestWithIds) -> Self {
        let UpdateVendorRequestWithIds(
            vendor_id,
            requested_user,
            UpdateVendorRequest {
                business_name,
                category,
                description,
                pricing,
            },
        ) = value;
        Self {
            vendor_id,
            requested_user,
            business_name,
            category,
            description,
            pricing,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VendorListQuery {
    #[garde(length(min = 1))]
    pub category: Option<String>,
    #[garde(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

impl From<VendorListQuery> for VendorListOptions {
    fn from(value: VendorListQuery) -> Self {
        let VendorListQuery {
            category,
            limit,
            offset,
        } = value;
        Self {
            category,
            limit,
            offset,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorResponse {
    pub vendor_id: VendorId,
    pub business_name: String,
    pub category: String,
    pub description: String,
    pub pricing: String,
    pub status: ApprovalStatus,
    pub owner: ListingOwnerResponse,
    pub created_at: DateTime<Utc>,
}

impl From<Vendor> for VendorResponse {
    fn from(value: Vendor) -> Self {
        let Vendor {
            vendor_id,
            business_name,
            category,
            description,
            pricing,
            status,
            owner,
            created_at,
        } = value;
        Self {
            vendor_id,
            business_name,
            category,
            description,
            pricing,
            status,
            owner: owner.into(),
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVendorResponse {
    pub vendor_id: VendorId,
}
