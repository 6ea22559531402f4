use crate::model::{
    id::{UserId, VendorId, VenueId},
    vendor::Vendor,
    venue::Venue,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn pending_vendors(&self) -> AppResult<Vec<Vendor>>;
    async fn pending_venues(&self) -> AppResult<Vec<Venue>>;
    /// 承認時はオーナーのロールを vendor に引き上げる（admin は降格しない）
    async fn decide_vendor(&self, vendor_id: VendorId, decided_by: UserId, decision: Decision) -> AppResult<()>;
    async fn decide_venue(&self, venue_id: VenueId, decided_by: UserId, decision: Decision) -> AppResult<()>;
}
