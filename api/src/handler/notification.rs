use axum::{extract::State, http::StatusCode, Json};
use kernel::model::id::NotificationId;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{AppPath, AppQuery, AuthorizedUser},
    model::notification::{
        MarkedReadResponse, NotificationListQuery, NotificationsResponse, UnreadCountResponse,
    },
};

pub async fn show_notifications(
    user: AuthorizedUser,
    AppQuery(query): AppQuery<NotificationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<NotificationsResponse>> {
    registry
        .notification_repository()
        .find_by_user(user.id(), query.unread_only)
        .await
        .map(NotificationsResponse::from)
        .map(Json)
}

pub async fn show_unread_count(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UnreadCountResponse>> {
    registry
        .notification_repository()
        .count_unread(user.id())
        .await
        .map(|unread| Json(UnreadCountResponse { unread }))
}

pub async fn mark_read(
    user: AuthorizedUser,
    AppPath(notification_id): AppPath<NotificationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .notification_repository()
        .mark_read(user.id(), notification_id)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn mark_all_read(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MarkedReadResponse>> {
    registry
        .notification_repository()
        .mark_all_read(user.id())
        .await
        .map(|updated| Json(MarkedReadResponse { updated }))
}
