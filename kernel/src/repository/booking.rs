use crate::model::{
    booking::{
        event::{CreateBooking, IncomingBookingQuery, UpdateBookingStatus},
        Booking, BookingCreated,
    },
    id::{BookingId, UserId},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 重複チェックと登録を 1 つの SERIALIZABLE トランザクションで行う
    async fn create(&self, event: CreateBooking) -> AppResult<BookingCreated>;
    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<()>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    async fn find_by_client(&self, user_id: UserId) -> AppResult<Vec<Booking>>;
    async fn find_incoming(&self, query: IncomingBookingQuery) -> AppResult<Vec<Booking>>;
}
