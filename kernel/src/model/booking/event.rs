use crate::model::{
    booking::{BookingStatus, BookingTarget, DateRange},
    id::{BookingId, UserId},
};
use derive_new::new;
use rust_decimal::Decimal;

#[derive(new, Debug)]
pub struct CreateBooking {
    pub client_id: UserId,
    pub target: BookingTarget,
    pub range: DateRange,
    pub guest_count: Option<i32>,
    pub notes: String,
    pub amount: Option<Decimal>,
}

#[derive(new, Debug)]
pub struct UpdateBookingStatus {
    pub booking_id: BookingId,
    pub requested_user: UserId,
    pub requested_by_admin: bool,
    pub status: BookingStatus,
}

#[derive(Debug)]
pub struct IncomingBookingQuery {
    pub owner_id: UserId,
    pub status: Option<BookingStatus>,
}

