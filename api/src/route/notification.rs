use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::notification::{mark_all_read, mark_read, show_notifications, show_unread_count};

pub fn build_notification_routers() -> Router<AppRegistry> {
    let notifications_routers = Router::new()
        .route("/", get(show_notifications))
        .route("/unread-count", get(show_unread_count))
        .route("/read-all", put(mark_all_read))
        .route("/:notification_id/read", put(mark_read));

    Router::new().nest("/notifications", notifications_routers)
}
