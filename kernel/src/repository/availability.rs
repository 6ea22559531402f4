use crate::model::{
    availability::{
        event::{DeleteAvailability, SetAvailability},
        CalendarDay,
    },
    booking::{BookingTarget, DateRange},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn calendar(&self, target: BookingTarget, range: DateRange) -> AppResult<Vec<CalendarDay>>;
    async fn upsert(&self, event: SetAvailability) -> AppResult<()>;
    async fn delete(&self, event: DeleteAvailability) -> AppResult<()>;
}
