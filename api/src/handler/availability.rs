use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    availability::event::{DeleteAvailability, SetAvailability},
    booking::{BookingTarget, DateRange},
    id::{VendorId, VenueId},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppJson, AppPath, AppQuery, AuthorizedUser},
    handler::{vendor, venue},
    model::availability::{CalendarQuery, CalendarResponse, SetAvailabilityRequest},
};

// 詳細画面と同じく、見せられない対象のカレンダーは存在しないものとして扱う
pub async fn show_vendor_calendar(
    user: AuthorizedUser,
    AppPath(vendor_id): AppPath<VendorId>,
    AppQuery(query): AppQuery<CalendarQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CalendarResponse>> {
    let visible = registry
        .vendor_repository()
        .find_by_id(vendor_id)
        .await?
        .is_some_and(|v| vendor::visible_to(&v, &user));
    if !visible {
        return Err(AppError::EntityNotFound(format!("vendor {vendor_id} not found")));
    }
    calendar(&registry, BookingTarget::Vendor(vendor_id), query).await
}

pub async fn show_venue_calendar(
    user: AuthorizedUser,
    AppPath(venue_id): AppPath<VenueId>,
    AppQuery(query): AppQuery<CalendarQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CalendarResponse>> {
    let visible = registry
        .venue_repository()
        .find_by_id(venue_id)
        .await?
        .is_some_and(|v| venue::visible_to(&v, &user));
    if !visible {
        return Err(AppError::EntityNotFound(format!("venue {venue_id} not found")));
    }
    calendar(&registry, BookingTarget::Venue(venue_id), query).await
}

pub async fn set_vendor_availability(
    user: AuthorizedUser,
    AppPath(vendor_id): AppPath<VendorId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<SetAvailabilityRequest>,
) -> AppResult<StatusCode> {
    set(&registry, &user, BookingTarget::Vendor(vendor_id), req).await
}

pub async fn set_venue_availability(
    user: AuthorizedUser,
    AppPath(venue_id): AppPath<VenueId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<SetAvailabilityRequest>,
) -> AppResult<StatusCode> {
    set(&registry, &user, BookingTarget::Venue(venue_id), req).await
}

pub async fn delete_vendor_availability(
    user: AuthorizedUser,
    AppPath((vendor_id, date)): AppPath<(VendorId, NaiveDate)>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    delete(&registry, &user, BookingTarget::Vendor(vendor_id), date).await
}

pub async fn delete_venue_availability(
    user: AuthorizedUser,
    AppPath((venue_id, date)): AppPath<(VenueId, NaiveDate)>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    delete(&registry, &user, BookingTarget::Venue(venue_id), date).await
}

async fn calendar(
    registry: &AppRegistry,
    target: BookingTarget,
    query: CalendarQuery,
) -> AppResult<Json<CalendarResponse>> {
    let range = DateRange::new(query.from, query.to)?;
    let days = registry
        .availability_repository()
        .calendar(target, range)
        .await?;

    Ok(Json(CalendarResponse {
        from: range.start(),
        to: range.end(),
        days: days.into_iter().map(Into::into).collect(),
    }))
}

async fn set(
    registry: &AppRegistry,
    user: &AuthorizedUser,
    target: BookingTarget,
    req: SetAvailabilityRequest,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let SetAvailabilityRequest {
        date,
        is_available,
        note,
    } = req;
    registry
        .availability_repository()
        .upsert(SetAvailability {
            target,
            requested_user: user.id(),
            date,
            is_available,
            note,
        })
        .await
        .map(|_| StatusCode::OK)
}

async fn delete(
    registry: &AppRegistry,
    user: &AuthorizedUser,
    target: BookingTarget,
    date: NaiveDate,
) -> AppResult<StatusCode> {
    registry
        .availability_repository()
        .delete(DeleteAvailability {
            target,
            requested_user: user.id(),
            date,
        })
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
