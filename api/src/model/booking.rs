use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use kernel::model::{
    booking::{Booking, BookingClient, BookingCreated, BookingStatus},
    id::{BookingId, UserId, VendorId, VenueId},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorBookingRequest {
    #[garde(skip)]
    pub vendor_id: VendorId,
    #[garde(skip)]
    pub event_date: NaiveDate,
    #[garde(length(max = 2000))]
    #[serde(default)]
    pub notes: String,
    #[garde(custom(non_negative))]
    pub amount: Option<Decimal>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueBookingRequest {
    #[garde(skip)]
    pub venue_id: VenueId,
    #[garde(skip)]
    pub start_date: NaiveDate,
    #[garde(skip)]
    pub end_date: NaiveDate,
    #[garde(range(min = 1))]
    pub guest_count: Option<i32>,
    #[garde(length(max = 2000))]
    #[serde(default)]
    pub notes: String,
    #[garde(custom(non_negative))]
    pub amount: Option<Decimal>,
}

fn non_negative(value: &Option<Decimal>, _: &()) -> garde::Result {
    match value {
        Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
            Err(garde::Error::new("amount must not be negative"))
        }
        _ => Ok(()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    pub booking_id: BookingId,
    pub warnings: Vec<String>,
}

impl From<BookingCreated> for BookingCreatedResponse {
    fn from(value: BookingCreated) -> Self {
        let BookingCreated {
            booking_id,
            warnings,
        } = value;
        Self {
            booking_id,
            warnings,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingBookingsQuery {
    pub status: Option<BookingStatus>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingClientResponse {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

impl From<BookingClient> for BookingClientResponse {
    fn from(value: BookingClient) -> Self {
        let BookingClient {
            user_id,
            name,
            email,
        } = value;
        Self {
            user_id,
            name,
            email,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub client: BookingClientResponse,
    pub target_type: String,
    pub target_id: String,
    pub target_name: String,
    pub owner_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guest_count: Option<i32>,
    pub status: BookingStatus,
    pub notes: String,
    pub amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            client,
            target,
            target_name,
            owner_id,
            range,
            guest_count,
            status,
            notes,
            amount,
            created_at,
            updated_at,
        } = value;
        Self {
            booking_id,
            client: client.into(),
            target_type: target.kind().as_ref().to_string(),
            target_id: target.raw_id().to_string(),
            target_name,
            owner_id,
            start_date: range.start(),
            end_date: range.end(),
            guest_count,
            status,
            notes,
            amount,
            created_at,
            updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::booking::{BookingTarget, DateRange};
    use std::str::FromStr;

    #[test]
    fn negative_amount_is_rejected() {
        let req: CreateVendorBookingRequest = serde_json::from_value(serde_json::json!({
            "vendorId": VendorId::new().to_string(),
            "eventDate": "2030-05-01",
            "amount": "-10.00"
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn zero_guests_is_rejected() {
        let req: CreateVenueBookingRequest = serde_json::from_value(serde_json::json!({
            "venueId": VenueId::new().to_string(),
            "startDate": "2030-05-01",
            "endDate": "2030-05-02",
            "guestCount": 0
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn response_flattens_target_and_range() {
        let venue_id = VenueId::new();
        let start = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2030, 5, 3).unwrap();
        let booking = Booking {
            booking_id: BookingId::new(),
            client: BookingClient {
                user_id: UserId::new(),
                name: "Aiko Tanaka".into(),
                email: "aiko@example.com".into(),
            },
            target: BookingTarget::Venue(venue_id),
            target_name: "Harbor Hall".into(),
            owner_id: UserId::new(),
            range: DateRange::new(start, end).unwrap(),
            guest_count: Some(120),
            status: BookingStatus::Pending,
            notes: String::new(),
            amount: Some(Decimal::from_str("1500.00").unwrap()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(BookingResponse::from(booking)).unwrap();
        assert_eq!(json["targetType"], "venue");
        assert_eq!(json["targetId"], venue_id.to_string());
        assert_eq!(json["startDate"], "2030-05-01");
        assert_eq!(json["endDate"], "2030-05-03");
        assert_eq!(json["status"], "Pending");
    }
}
