use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::auth::LoginSession;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AppJson,
    model::{
        auth::{AccessTokenResponse, LoginRequest, RegisterRequest},
        user::UserResponse,
    },
};

pub async fn register(
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    req.validate(&())?;

    let user = registry.user_repository().create(req.into()).await?;
    tracing::info!(user_id = %user.user_id, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    req.validate(&())?;

    let user_id = registry
        .auth_repository()
        .verify_user(&req.email, &req.password)
        .await?;
    let user = registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .ok_or(AppError::UnauthenticatedError)?;
    let access_token = registry.auth_repository().create_token(user_id).await?;

    Ok(Json(
        LoginSession {
            access_token,
            user_id,
            role: user.role,
        }
        .into(),
    ))
}
