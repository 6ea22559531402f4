use crate::model::{
    booking::BookingStatus,
    id::{BookingId, NotificationId, UserId},
};
use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    BookingRequested,
    BookingConfirmed,
    BookingRejected,
    BookingCancelled,
    BookingCompleted,
    ApplicationApproved,
    ApplicationRejected,
    NewMessage,
}

impl NotificationKind {
    /// 予約ステータスの変更に対応する通知種別
    pub fn for_booking_status(status: BookingStatus) -> Option<Self> {
        match status {
            BookingStatus::Pending => None,
            BookingStatus::Confirmed => Some(Self::BookingConfirmed),
            BookingStatus::Rejected => Some(Self::BookingRejected),
            BookingStatus::Cancelled => Some(Self::BookingCancelled),
            BookingStatus::Completed => Some(Self::BookingCompleted),
        }
    }
}

#[derive(Debug)]
pub struct Notification {
    pub notification_id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub booking_id: Option<BookingId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// 予約や審査の処理と同じトランザクションで書き込む通知
#[derive(Debug)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub booking_id: Option<BookingId>,
}

impl NewNotification {
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            booking_id: None,
        }
    }

    pub fn with_booking(mut self, booking_id: BookingId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_stored_as_snake_case() {
        assert_eq!(NotificationKind::BookingRequested.as_ref(), "booking_requested");
        assert_eq!(
            "application_approved".parse::<NotificationKind>().ok(),
            Some(NotificationKind::ApplicationApproved)
        );
    }

    #[test]
    fn pending_status_has_no_notification() {
        assert_eq!(NotificationKind::for_booking_status(BookingStatus::Pending), None);
        assert_eq!(
            NotificationKind::for_booking_status(BookingStatus::Cancelled),
            Some(NotificationKind::BookingCancelled)
        );
    }
}
