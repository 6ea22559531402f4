use axum::{extract::State, http::StatusCode, Json};
use kernel::{
    model::id::{VendorId, VenueId},
    repository::application::Decision,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{AppJson, AppPath, AuthorizedUser},
    model::{
        admin::{DecisionRequest, PendingVendorsResponse, PendingVenuesResponse},
        vendor::VendorResponse,
        venue::VenueResponse,
    },
};

pub async fn show_pending_vendors(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PendingVendorsResponse>> {
    user.ensure_admin()?;

    let items = registry
        .application_repository()
        .pending_vendors()
        .await?
        .into_iter()
        .map(VendorResponse::from)
        .collect();
    Ok(Json(PendingVendorsResponse { items }))
}

pub async fn show_pending_venues(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PendingVenuesResponse>> {
    user.ensure_admin()?;

    let items = registry
        .application_repository()
        .pending_venues()
        .await?
        .into_iter()
        .map(VenueResponse::from)
        .collect();
    Ok(Json(PendingVenuesResponse { items }))
}

pub async fn decide_vendor(
    user: AuthorizedUser,
    AppPath(vendor_id): AppPath<VendorId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<DecisionRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    let decision: Decision = req.decision.into();
    registry
        .application_repository()
        .decide_vendor(vendor_id, user.id(), decision)
        .await?;
    tracing::info!(%vendor_id, ?decision, "vendor application decided");
    Ok(StatusCode::OK)
}

pub async fn decide_venue(
    user: AuthorizedUser,
    AppPath(venue_id): AppPath<VenueId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<DecisionRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    let decision: Decision = req.decision.into();
    registry
        .application_repository()
        .decide_venue(venue_id, user.id(), decision)
        .await?;
    tracing::info!(%venue_id, ?decision, "venue application decided");
    Ok(StatusCode::OK)
}
