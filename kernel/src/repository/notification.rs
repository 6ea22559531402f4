use crate::model::{
    id::{NotificationId, UserId},
    notification::Notification,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn find_by_user(&self, user_id: UserId, unread_only: bool) -> AppResult<Vec<Notification>>;
    async fn count_unread(&self, user_id: UserId) -> AppResult<i64>;
    async fn mark_read(&self, user_id: UserId, notification_id: NotificationId) -> AppResult<()>;
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;
}
