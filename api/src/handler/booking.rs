use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    booking::{
        event::{CreateBooking, IncomingBookingQuery, UpdateBookingStatus},
        BookingTarget, DateRange,
    },
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppJson, AppPath, AppQuery, AuthorizedUser},
    model::booking::{
        BookingCreatedResponse, BookingResponse, BookingsResponse, CreateVendorBookingRequest,
        CreateVenueBookingRequest, IncomingBookingsQuery, UpdateBookingStatusRequest,
    },
};

pub async fn book_vendor(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateVendorBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingCreatedResponse>)> {
    req.validate(&())?;

    // ベンダーはイベント当日の 1 日だけを押さえる
    let range = DateRange::single(req.event_date);
    range.ensure_not_before(Utc::now().date_naive())?;

    let event = CreateBooking::new(
        user.id(),
        BookingTarget::Vendor(req.vendor_id),
        range,
        None,
        req.notes,
        req.amount,
    );
    create(&registry, event).await
}

pub async fn book_venue(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateVenueBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingCreatedResponse>)> {
    req.validate(&())?;

    let range = DateRange::new(req.start_date, req.end_date)?;
    range.ensure_not_before(Utc::now().date_naive())?;

    let event = CreateBooking::new(
        user.id(),
        BookingTarget::Venue(req.venue_id),
        range,
        req.guest_count,
        req.notes,
        req.amount,
    );
    create(&registry, event).await
}

async fn create(
    registry: &AppRegistry,
    event: CreateBooking,
) -> AppResult<(StatusCode, Json<BookingCreatedResponse>)> {
    let created = registry.booking_repository().create(event).await?;
    tracing::info!(booking_id = %created.booking_id, "booking requested");
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn show_my_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_by_client(user.id())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_incoming_bookings(
    user: AuthorizedUser,
    AppQuery(query): AppQuery<IncomingBookingsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_incoming(IncomingBookingQuery {
            owner_id: user.id(),
            status: query.status,
        })
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    user: AuthorizedUser,
    AppPath(booking_id): AppPath<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("booking {booking_id} not found")))?;

    if booking.actor_for(user.id(), user.is_admin()).is_none() {
        return Err(AppError::ForbiddenOperation);
    }
    Ok(Json(booking.into()))
}

pub async fn update_booking_status(
    user: AuthorizedUser,
    AppPath(booking_id): AppPath<BookingId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateBookingStatusRequest>,
) -> AppResult<StatusCode> {
    let event = UpdateBookingStatus::new(booking_id, user.id(), user.is_admin(), req.status);
    registry
        .booking_repository()
        .update_status(event)
        .await
        .map(|_| StatusCode::OK)
}
