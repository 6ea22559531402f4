use chrono::{DateTime, NaiveDate, Utc};
use kernel::model::{
    availability::BookedSpan,
    booking::{Booking, BookingClient, BookingTarget, DateRange},
    id::{BookingId, UserId, VendorId, VenueId},
};
use rust_decimal::Decimal;
use shared::error::AppError;
use sqlx::FromRow;

use super::parse_stored;

pub struct BookingRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub client_name: String,
    pub client_email: String,
    pub vendor_id: Option<VendorId>,
    pub venue_id: Option<VenueId>,
    pub target_name: String,
    pub owner_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guest_count: Option<i32>,
    pub status: String,
    pub notes: String,
    pub amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            user_id,
            client_name,
            client_email,
            vendor_id,
            venue_id,
            target_name,
            owner_id,
            start_date,
            end_date,
            guest_count,
            status,
            notes,
            amount,
            created_at,
            updated_at,
        } = value;

        let target = match (vendor_id, venue_id) {
            (Some(vendor_id), None) => BookingTarget::Vendor(vendor_id),
            (None, Some(venue_id)) => BookingTarget::Venue(venue_id),
            _ => {
                return Err(AppError::ConversionEntityError(format!(
                    "booking {booking_id} must reference exactly one vendor or venue"
                )))
            }
        };

        Ok(Booking {
            booking_id,
            client: BookingClient {
                user_id,
                name: client_name,
                email: client_email,
            },
            target,
            target_name,
            owner_id,
            range: DateRange::new(start_date, end_date)?,
            guest_count,
            status: parse_stored("bookings.status", &status)?,
            notes,
            amount,
            created_at,
            updated_at,
        })
    }
}

// カレンダー計算用
#[derive(FromRow)]
pub struct BookedSpanRow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

impl TryFrom<BookedSpanRow> for BookedSpan {
    type Error = AppError;

    fn try_from(value: BookedSpanRow) -> Result<Self, Self::Error> {
        Ok(BookedSpan {
            range: DateRange::new(value.start_date, value.end_date)?,
            status: parse_stored("bookings.status", &value.status)?,
        })
    }
}

// 予約対象の存在確認と予約可否の判定に使う
#[derive(FromRow)]
pub struct BookingTargetRow {
    pub owner_id: UserId,
    pub name: String,
    pub status: String,
    pub capacity: Option<i32>,
}

// ステータス変更時に予約をロックして読む
pub struct BookingStateRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub vendor_id: Option<VendorId>,
    pub venue_id: Option<VenueId>,
    pub owner_id: UserId,
    pub target_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::booking::BookingStatus;

    fn row(vendor_id: Option<VendorId>, venue_id: Option<VenueId>) -> BookingRow {
        let day = NaiveDate::from_ymd_opt(2026, 9, 12).unwrap();
        BookingRow {
            booking_id: BookingId::new(),
            user_id: UserId::new(),
            client_name: "Ana Cruz".into(),
            client_email: "ana@example.com".into(),
            vendor_id,
            venue_id,
            target_name: "Lumen Studio".into(),
            owner_id: UserId::new(),
            start_date: day,
            end_date: day,
            guest_count: None,
            status: "Confirmed".into(),
            notes: String::new(),
            amount: Some(Decimal::new(1500000, 2)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn converts_vendor_booking_row() {
        let vendor_id = VendorId::new();
        let booking = Booking::try_from(row(Some(vendor_id), None)).unwrap();
        assert_eq!(booking.target, BookingTarget::Vendor(vendor_id));
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.range.num_days(), 1);
    }

    #[test]
    fn rejects_row_without_single_target() {
        assert!(Booking::try_from(row(None, None)).is_err());
        assert!(Booking::try_from(row(Some(VendorId::new()), Some(VenueId::new()))).is_err());
    }

    #[test]
    fn rejects_unknown_status() {
        let mut r = row(None, Some(VenueId::new()));
        r.status = "Archived".into();
        assert!(Booking::try_from(r).is_err());
    }
}
