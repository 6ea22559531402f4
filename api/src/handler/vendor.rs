use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::{id::VendorId, vendor::Vendor};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppJson, AppPath, AppQuery, AuthorizedUser},
    model::{
        vendor::{
            CreateVendorRequest, CreateVendorRequestWithUserId, CreatedVendorResponse,
            UpdateVendorRequest, UpdateVendorRequestWithIds, VendorListQuery, VendorResponse,
        },
        PaginatedResponse,
    },
};

pub async fn register_vendor(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateVendorRequest>,
) -> AppResult<(StatusCode, Json<CreatedVendorResponse>)> {
    req.validate(&())?;

    let vendor_id = registry
        .vendor_repository()
        .create(CreateVendorRequestWithUserId::new(user.id(), req).into())
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedVendorResponse { vendor_id })))
}

pub async fn show_vendor_list(
    _user: AuthorizedUser,
    AppQuery(query): AppQuery<VendorListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedResponse<VendorResponse>>> {
    query.validate(&())?;

    registry
        .vendor_repository()
        .find_approved(query.into())
        .await
        .map(PaginatedResponse::from)
        .map(Json)
}

pub async fn show_my_vendor(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VendorResponse>> {
    registry
        .vendor_repository()
        .find_by_owner(user.id())
        .await?
        .map(|v| Json(v.into()))
        .ok_or_else(|| AppError::EntityNotFound("no vendor profile for this user".into()))
}

pub async fn show_vendor(
    user: AuthorizedUser,
    AppPath(vendor_id): AppPath<VendorId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VendorResponse>> {
    registry
        .vendor_repository()
        .find_by_id(vendor_id)
        .await?
        .filter(|v| visible_to(v, &user))
        .map(|v| Json(v.into()))
        .ok_or_else(|| AppError::EntityNotFound(format!("vendor {vendor_id} not found")))
}

pub async fn update_vendor(
    user: AuthorizedUser,
    AppPath(vendor_id): AppPath<VendorId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateVendorRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let vendor = registry
        .vendor_repository()
        .find_by_id(vendor_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("vendor {vendor_id} not found")))?;
    if !vendor.is_owned_by(user.id()) {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .vendor_repository()
        .update(UpdateVendorRequestWithIds::new(vendor_id, user.id(), req).into())
        .await
        .map(|_| StatusCode::OK)
}

// 審査前・却下済みのプロフィールは本人と管理者にしか見せない
pub(crate) fn visible_to(vendor: &Vendor, user: &AuthorizedUser) -> bool {
    vendor.is_bookable() || vendor.is_owned_by(user.id()) || user.is_admin()
}
