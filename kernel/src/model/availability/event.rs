use crate::model::{booking::BookingTarget, id::UserId};
use chrono::NaiveDate;

#[derive(Debug)]
pub struct SetAvailability {
    pub target: BookingTarget,
    pub requested_user: UserId,
    pub date: NaiveDate,
    pub is_available: bool,
    pub note: String,
}

#[derive(Debug)]
pub struct DeleteAvailability {
    pub target: BookingTarget,
    pub requested_user: UserId,
    pub date: NaiveDate,
}
