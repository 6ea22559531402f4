use chrono::{DateTime, Utc};
use kernel::model::{
    id::{BookingId, NotificationId},
    notification::Notification,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub notification_id: NotificationId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub booking_id: Option<BookingId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        let Notification {
            notification_id,
            user_id: _,
            kind,
            title,
            message,
            booking_id,
            is_read,
            created_at,
        } = value;
        Self {
            notification_id,
            kind: kind.as_ref().to_string(),
            title,
            message,
            booking_id,
            is_read,
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub items: Vec<NotificationResponse>,
}

impl From<Vec<Notification>> for NotificationsResponse {
    fn from(value: Vec<Notification>) -> Self {
        Self {
            items: value.into_iter().map(NotificationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedReadResponse {
    pub updated: u64,
}
