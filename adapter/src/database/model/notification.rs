use chrono::{DateTime, Utc};
use kernel::model::{
    id::{BookingId, NotificationId, UserId},
    notification::Notification,
};
use shared::error::AppError;

use super::parse_stored;

pub struct NotificationRow {
    pub notification_id: NotificationId,
    pub user_id: UserId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub booking_id: Option<BookingId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(value: NotificationRow) -> Result<Self, Self::Error> {
        let NotificationRow {
            notification_id,
            user_id,
            kind,
            title,
            message,
            booking_id,
            is_read,
            created_at,
        } = value;
        Ok(Notification {
            notification_id,
            user_id,
            kind: parse_stored("notifications.kind", &kind)?,
            title,
            message,
            booking_id,
            is_read,
            created_at,
        })
    }
}
