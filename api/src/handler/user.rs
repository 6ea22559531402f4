use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppJson, AppPath, AuthorizedUser},
    model::user::{
        UpdateProfileRequest, UpdateProfileRequestWithUserId, UpdateUserRoleRequest,
        UpdateUserRoleRequestWithUserId, UserLookupResponse, UserResponse, UsersResponse,
    },
};

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}

pub async fn update_current_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    req.validate(&())?;

    registry
        .user_repository()
        .update_profile(UpdateProfileRequestWithUserId::new(user.id(), req).into())
        .await?;

    registry
        .user_repository()
        .find_current_user(user.id())
        .await?
        .map(|u| Json(u.into()))
        .ok_or_else(|| AppError::EntityNotFound("user not found".into()))
}

pub async fn find_user_by_firebase_uid(
    _user: AuthorizedUser,
    AppPath(firebase_uid): AppPath<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserLookupResponse>> {
    registry
        .user_repository()
        .find_by_firebase_uid(&firebase_uid)
        .await?
        .map(|u| Json(u.into()))
        .ok_or_else(|| AppError::EntityNotFound(format!("no user for firebase uid {firebase_uid}")))
}

pub async fn list_users(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    user.ensure_admin()?;

    let items = registry
        .user_repository()
        .find_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(UsersResponse { items }))
}

pub async fn change_role(
    user: AuthorizedUser,
    AppPath(user_id): AppPath<UserId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateUserRoleRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    registry
        .user_repository()
        .update_role(UpdateUserRoleRequestWithUserId::new(user_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}
