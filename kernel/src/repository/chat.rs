use crate::model::{
    chat::{Conversation, Message, MessageQuery, SendMessage},
    id::{ConversationId, UserId},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn open_conversation(&self, requester: UserId, participant: UserId) -> AppResult<Conversation>;
    async fn find_conversations(&self, user_id: UserId) -> AppResult<Vec<Conversation>>;
    /// 参加者でない会話は ForbiddenOperation、存在しなければ None
    async fn find_conversation(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> AppResult<Option<Conversation>>;
    async fn find_messages(&self, query: MessageQuery) -> AppResult<Vec<Message>>;
    async fn send_message(&self, event: SendMessage) -> AppResult<Message>;
}
