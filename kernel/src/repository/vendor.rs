use crate::model::{
    id::{UserId, VendorId},
    list::PaginatedList,
    vendor::{
        event::{CreateVendor, UpdateVendor},
        Vendor, VendorListOptions,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait VendorRepository: Send + Sync {
    async fn create(&self, event: CreateVendor) -> AppResult<VendorId>;
    /// 承認済みのベンダーのみを返す
    async fn find_approved(&self, options: VendorListOptions) -> AppResult<PaginatedList<Vendor>>;
    async fn find_by_id(&self, vendor_id: VendorId) -> AppResult<Option<Vendor>>;
    async fn find_by_owner(&self, user_id: UserId) -> AppResult<Option<Vendor>>;
    async fn update(&self, event: UpdateVendor) -> AppResult<()>;
}
