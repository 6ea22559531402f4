use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::{id::VenueId, venue::Venue};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppJson, AppPath, AppQuery, AuthorizedUser},
    model::{
        venue::{
            CreateVenueRequest, CreateVenueRequestWithUserId, CreatedVenueResponse,
            UpdateVenueRequest, UpdateVenueRequestWithIds, VenueListQuery, VenueResponse,
            VenuesResponse,
        },
        PaginatedResponse,
    },
};

pub async fn register_venue(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateVenueRequest>,
) -> AppResult<(StatusCode, Json<CreatedVenueResponse>)> {
    req.validate(&())?;

    let venue_id = registry
        .venue_repository()
        .create(CreateVenueRequestWithUserId::new(user.id(), req).into())
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedVenueResponse { venue_id })))
}

pub async fn show_venue_list(
    _user: AuthorizedUser,
    AppQuery(query): AppQuery<VenueListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedResponse<VenueResponse>>> {
    query.validate(&())?;

    registry
        .venue_repository()
        .find_active(query.into())
        .await
        .map(PaginatedResponse::from)
        .map(Json)
}

pub async fn show_my_venues(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VenuesResponse>> {
    registry
        .venue_repository()
        .find_by_owner(user.id())
        .await
        .map(VenuesResponse::from)
        .map(Json)
}

pub async fn show_venue(
    user: AuthorizedUser,
    AppPath(venue_id): AppPath<VenueId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VenueResponse>> {
    registry
        .venue_repository()
        .find_by_id(venue_id)
        .await?
        .filter(|v| visible_to(v, &user))
        .map(|v| Json(v.into()))
        .ok_or_else(|| AppError::EntityNotFound(format!("venue {venue_id} not found")))
}

pub async fn update_venue(
    user: AuthorizedUser,
    AppPath(venue_id): AppPath<VenueId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateVenueRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let venue = registry
        .venue_repository()
        .find_by_id(venue_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("venue {venue_id} not found")))?;
    if !venue.is_owned_by(user.id()) {
        return Err(AppError::ForbiddenOperation);
    }
    // 承認・却下は管理者の審査でのみ行う
    if let Some(next) = req.status {
        if !venue.status.owner_can_switch(next) {
            return Err(AppError::UnprocessableEntity(format!(
                "venue status cannot be changed from {} to {}",
                venue.status.as_ref(),
                next.as_ref()
            )));
        }
    }

    registry
        .venue_repository()
        .update(UpdateVenueRequestWithIds::new(venue_id, user.id(), req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub(crate) fn visible_to(venue: &Venue, user: &AuthorizedUser) -> bool {
    venue.is_bookable() || venue.is_owned_by(user.id()) || user.is_admin()
}
