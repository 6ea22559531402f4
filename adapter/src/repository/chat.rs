use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    chat::{ordered_pair, Conversation, Message, MessageQuery, SendMessage},
    id::{ConversationId, MessageId, UserId},
    notification::{NewNotification, NotificationKind},
};
use kernel::repository::chat::ChatRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::chat::{ConversationRow, MessageRow},
    ConnectionPool,
};
use crate::repository::notification::insert_notification;

#[derive(new)]
pub struct ChatRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ChatRepository for ChatRepositoryImpl {
    async fn open_conversation(&self, requester: UserId, participant: UserId) -> AppResult<Conversation> {
        if requester == participant {
            return Err(AppError::UnprocessableEntity(
                "cannot start a conversation with yourself".into(),
            ));
        }

        let exists = sqlx::query_scalar!(
            r#"SELECT EXISTS (SELECT 1 FROM credentials WHERE user_id = $1) AS "exists!""#,
            participant as _
        )
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if !exists {
            return Err(AppError::EntityNotFound(format!("user {participant} not found")));
        }

        let (a, b) = ordered_pair(requester, participant);
        sqlx::query!(
            r#"
                INSERT INTO conversations (conversation_id, participant_a, participant_b)
                VALUES ($1, $2, $3)
                ON CONFLICT (participant_a, participant_b) DO NOTHING
            "#,
            ConversationId::new() as _,
            a as _,
            b as _
        )
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        sqlx::query_as!(
            ConversationRow,
            r#"
                SELECT
                    c.conversation_id,
                    c.participant_a,
                    c.participant_b,
                    (u.first_name || ' ' || u.last_name) AS "counterpart_name!",
                    (SELECT MAX(m.sent_at) FROM messages AS m WHERE m.conversation_id = c.conversation_id)
                        AS last_message_at,
                    c.created_at
                FROM conversations AS c
                INNER JOIN credentials AS u ON u.user_id =
                    CASE WHEN c.participant_a = $1 THEN c.participant_b ELSE c.participant_a END
                WHERE (c.participant_a = $1 OR c.participant_b = $1)
                  AND c.participant_a = $2 AND c.participant_b = $3
            "#,
            requester as _,
            a as _,
            b as _
        )
        .fetch_one(self.db.inner_ref())
        .await
        .map(Conversation::from)
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_conversations(&self, user_id: UserId) -> AppResult<Vec<Conversation>> {
        sqlx::query_as!(
            ConversationRow,
            r#"
                SELECT
                    c.conversation_id,
                    c.participant_a,
                    c.participant_b,
                    (u.first_name || ' ' || u.last_name) AS "counterpart_name!",
                    (SELECT MAX(m.sent_at) FROM messages AS m WHERE m.conversation_id = c.conversation_id)
                        AS last_message_at,
                    c.created_at
                FROM conversations AS c
                INNER JOIN credentials AS u ON u.user_id =
                    CASE WHEN c.participant_a = $1 THEN c.participant_b ELSE c.participant_a END
                WHERE (c.participant_a = $1 OR c.participant_b = $1)
                ORDER BY last_message_at DESC NULLS LAST, c.created_at DESC
            "#,
            user_id as _
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Conversation::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_conversation(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> AppResult<Option<Conversation>> {
        let row = sqlx::query_as!(
            ConversationRow,
            r#"
                SELECT
                    c.conversation_id,
                    c.participant_a,
                    c.participant_b,
                    (u.first_name || ' ' || u.last_name) AS "counterpart_name!",
                    (SELECT MAX(m.sent_at) FROM messages AS m WHERE m.conversation_id = c.conversation_id)
                        AS last_message_at,
                    c.created_at
                FROM conversations AS c
                INNER JOIN credentials AS u ON u.user_id =
                    CASE WHEN c.participant_a = $1 THEN c.participant_b ELSE c.participant_a END
                WHERE (c.participant_a = $1 OR c.participant_b = $1)
                  AND c.conversation_id = $2
            "#,
            viewer as _,
            conversation_id as _
        )
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if let Some(row) = row {
            return Ok(Some(Conversation::from(row)));
        }

        // 存在するが参加者ではない場合は 403
        let exists = sqlx::query_scalar!(
            r#"SELECT EXISTS (SELECT 1 FROM conversations WHERE conversation_id = $1) AS "exists!""#,
            conversation_id as _
        )
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if exists {
            Err(AppError::ForbiddenOperation)
        } else {
            Ok(None)
        }
    }

    async fn find_messages(&self, query: MessageQuery) -> AppResult<Vec<Message>> {
        // 新しい順に limit 件取ってから古い順に並べ直す
        let mut messages: Vec<Message> = sqlx::query_as!(
            MessageRow,
            r#"
                SELECT message_id, conversation_id, sender_id, body, sent_at
                FROM messages
                WHERE conversation_id = $1
                  AND ($2::TIMESTAMPTZ IS NULL OR sent_at < $2)
                ORDER BY sent_at DESC
                LIMIT $3
            "#,
            query.conversation_id as _,
            query.before,
            query.limit
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Message::from)
        .collect();

        messages.reverse();
        Ok(messages)
    }

    async fn send_message(&self, event: SendMessage) -> AppResult<Message> {
        let SendMessage {
            conversation_id,
            sender_id,
            body,
        } = event;

        let mut tx = self.db.begin().await?;

        let participants = sqlx::query!(
            "SELECT participant_a, participant_b FROM conversations WHERE conversation_id = $1",
            conversation_id as _
        )
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(|row| (UserId::from(row.participant_a), UserId::from(row.participant_b)));

        let recipient = match participants {
            None => {
                return Err(AppError::EntityNotFound(format!(
                    "conversation {conversation_id} not found"
                )))
            }
            Some((a, b)) if a == sender_id => b,
            Some((a, b)) if b == sender_id => a,
            Some(_) => return Err(AppError::ForbiddenOperation),
        };

        let message = sqlx::query_as!(
            MessageRow,
            r#"
                INSERT INTO messages (message_id, conversation_id, sender_id, body)
                VALUES ($1, $2, $3, $4)
                RETURNING message_id, conversation_id, sender_id, body, sent_at
            "#,
            MessageId::new() as _,
            conversation_id as _,
            sender_id as _,
            body
        )
        .fetch_one(&mut *tx)
        .await
        .map(Message::from)
        .map_err(AppError::SpecificOperationError)?;

        insert_notification(
            &mut *tx,
            NewNotification::new(
                recipient,
                NotificationKind::NewMessage,
                "New message",
                preview(&message.body),
            ),
        )
        .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(message)
    }
}

/// 通知に載せるメッセージの冒頭部分
fn preview(body: &str) -> String {
    const PREVIEW_CHARS: usize = 80;
    if body.chars().count() <= PREVIEW_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_messages() {
        assert_eq!(preview("see you at the venue"), "see you at the venue");
        let long = "a".repeat(200);
        let p = preview(&long);
        assert_eq!(p.chars().count(), 81);
        assert!(p.ends_with('…'));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server"]
    async fn only_participants_can_use_a_conversation(pool: sqlx::PgPool) -> anyhow::Result<()> {
        use crate::repository::fixture::{notification_kinds, user};

        let db = ConnectionPool::new(pool);
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bob").await?;
        let mallory = user(&db, "mallory").await?;

        let repo = ChatRepositoryImpl::new(db.clone());
        let opened = repo.open_conversation(alice, bob).await?;
        // 逆向きに開いても同じ会話になる
        let reopened = repo.open_conversation(bob, alice).await?;
        assert_eq!(opened.conversation_id, reopened.conversation_id);

        repo.send_message(SendMessage {
            conversation_id: opened.conversation_id,
            sender_id: alice,
            body: "Is the hall free in June?".into(),
        })
        .await?;
        assert_eq!(notification_kinds(&db, bob).await?, ["new_message"]);

        let peek = repo.find_conversation(opened.conversation_id, mallory).await;
        assert!(matches!(peek, Err(AppError::ForbiddenOperation)));
        let post = repo
            .send_message(SendMessage {
                conversation_id: opened.conversation_id,
                sender_id: mallory,
                body: "hello".into(),
            })
            .await;
        assert!(matches!(post, Err(AppError::ForbiddenOperation)));

        let unknown = ConversationId::new();
        assert!(repo.find_conversation(unknown, alice).await?.is_none());
        let post = repo
            .send_message(SendMessage {
                conversation_id: unknown,
                sender_id: alice,
                body: "hello".into(),
            })
            .await;
        assert!(matches!(post, Err(AppError::EntityNotFound(_))));
        Ok(())
    }
}
