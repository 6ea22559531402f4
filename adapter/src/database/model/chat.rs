use chrono::{DateTime, Utc};
use kernel::model::{
    chat::{Conversation, Message},
    id::{ConversationId, MessageId, UserId},
};

pub struct ConversationRow {
    pub conversation_id: ConversationId,
    pub participant_a: UserId,
    pub participant_b: UserId,
    pub counterpart_name: String,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(value: ConversationRow) -> Self {
        let ConversationRow {
            conversation_id,
            participant_a,
            participant_b,
            counterpart_name,
            last_message_at,
            created_at,
        } = value;
        Conversation {
            conversation_id,
            participant_a,
            participant_b,
            counterpart_name,
            last_message_at,
            created_at,
        }
    }
}

pub struct MessageRow {
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(value: MessageRow) -> Self {
        let MessageRow {
            message_id,
            conversation_id,
            sender_id,
            body,
            sent_at,
        } = value;
        Message {
            message_id,
            conversation_id,
            sender_id,
            body,
            sent_at,
        }
    }
}
