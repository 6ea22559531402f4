use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{NotificationId, UserId},
    notification::{NewNotification, Notification},
};
use kernel::repository::notification::NotificationRepository;
use shared::error::{AppError, AppResult};
use sqlx::PgConnection;

use crate::database::{model::notification::NotificationRow, ConnectionPool};

#[derive(new)]
pub struct NotificationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl NotificationRepository for NotificationRepositoryImpl {
    async fn find_by_user(&self, user_id: UserId, unread_only: bool) -> AppResult<Vec<Notification>> {
        sqlx::query_as!(
            NotificationRow,
            r#"
                SELECT
                    notification_id,
                    user_id,
                    kind,
                    title,
                    message,
                    booking_id AS "booking_id: _",
                    is_read,
                    created_at
                FROM notifications
                WHERE user_id = $1
                  AND ($2 = FALSE OR is_read = FALSE)
                ORDER BY created_at DESC
            "#,
            user_id as _,
            unread_only
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Notification::try_from)
        .collect()
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar!(
            r#"SELECT COUNT(*) AS "count!" FROM notifications WHERE user_id = $1 AND is_read = FALSE"#,
            user_id as _
        )
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn mark_read(&self, user_id: UserId, notification_id: NotificationId) -> AppResult<()> {
        let res = sqlx::query!(
            r#"
                UPDATE notifications
                SET is_read = TRUE
                WHERE notification_id = $1 AND user_id = $2
            "#,
            notification_id as _,
            user_id as _
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 他人の通知は存在しないものとして扱う
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified notification not found".into()));
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        sqlx::query!(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
            user_id as _
        )
        .execute(self.db.inner_ref())
        .await
        .map(|res| res.rows_affected())
        .map_err(AppError::SpecificOperationError)
    }
}

/// 呼び出し元のトランザクション内で通知を書き込む
pub(crate) async fn insert_notification(
    conn: &mut PgConnection,
    notification: NewNotification,
) -> AppResult<()> {
    let NewNotification {
        user_id,
        kind,
        title,
        message,
        booking_id,
    } = notification;

    sqlx::query!(
        r#"
            INSERT INTO notifications (notification_id, user_id, kind, title, message, booking_id)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#,
        NotificationId::new() as _,
        user_id as _,
        kind.as_ref(),
        title,
        message,
        booking_id as _
    )
    .execute(conn)
    .await
    .map_err(AppError::SpecificOperationError)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixture::user;
    use kernel::model::notification::NotificationKind;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn notifications_are_private_to_their_recipient(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bob").await?;

        let mut conn = db.inner_ref().acquire().await?;
        insert_notification(
            &mut *conn,
            NewNotification::new(alice, NotificationKind::NewMessage, "New message", "hi"),
        )
        .await?;
        drop(conn);

        let repo = NotificationRepositoryImpl::new(db);
        let notification_id = repo.find_by_user(alice, true).await?[0].notification_id;

        let res = repo.mark_read(bob, notification_id).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        assert_eq!(repo.count_unread(alice).await?, 1);

        let res = repo.mark_read(alice, NotificationId::new()).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        repo.mark_read(alice, notification_id).await?;
        assert_eq!(repo.count_unread(alice).await?, 0);
        assert!(repo.find_by_user(alice, true).await?.is_empty());
        assert_eq!(repo.find_by_user(alice, false).await?.len(), 1);
        assert_eq!(repo.mark_all_read(alice).await?, 0);
        Ok(())
    }
}
