use crate::model::id::{ConversationId, MessageId, UserId};
use chrono::{DateTime, Utc};

pub const MAX_MESSAGE_LEN: usize = 2000;

#[derive(Debug)]
pub struct Conversation {
    pub conversation_id: ConversationId,
    pub participant_a: UserId,
    pub participant_b: UserId,
    pub counterpart_name: String,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }

    pub fn counterpart_of(&self, user_id: UserId) -> UserId {
        if self.participant_a == user_id {
            self.participant_b
        } else {
            self.participant_a
        }
    }
}

/// 会話の参加者の組を正規化する（小さい ID が先）
pub fn ordered_pair(a: UserId, b: UserId) -> (UserId, UserId) {
    if a.raw() <= b.raw() {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug)]
pub struct Message {
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SendMessage {
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: String,
}

#[derive(Debug)]
pub struct MessageQuery {
    pub conversation_id: ConversationId,
    pub before: Option<DateTime<Utc>>,
    pub limit: i64,
}
