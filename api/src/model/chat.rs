use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    chat::{Conversation, Message, MAX_MESSAGE_LEN},
    id::{ConversationId, MessageId, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenConversationRequest {
    pub participant_id: UserId,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[garde(length(chars, min = 1, max = MAX_MESSAGE_LEN))]
    pub body: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MessageListQuery {
    #[garde(skip)]
    pub before: Option<DateTime<Utc>>,
    #[garde(range(min = 1, max = 200))]
    #[serde(default = "default_message_limit")]
    pub limit: i64,
}

fn default_message_limit() -> i64 {
    50
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation_id: ConversationId,
    pub counterpart_id: UserId,
    pub counterpart_name: String,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ConversationResponse {
    // 相手側の情報は見ている本人によって変わる
    pub fn for_viewer(conversation: Conversation, viewer: UserId) -> Self {
        Self {
            counterpart_id: conversation.counterpart_of(viewer),
            conversation_id: conversation.conversation_id,
            counterpart_name: conversation.counterpart_name,
            last_message_at: conversation.last_message_at,
            created_at: conversation.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationsResponse {
    pub items: Vec<ConversationResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(value: Message) -> Self {
        let Message {
            message_id,
            conversation_id,
            sender_id,
            body,
            sent_at,
        } = value;
        Self {
            message_id,
            conversation_id,
            sender_id,
            body,
            sent_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub items: Vec<MessageResponse>,
}

impl From<Vec<Message>> for MessagesResponse {
    fn from(value: Vec<Message>) -> Self {
        Self {
            items: value.into_iter().map(MessageResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_length_is_counted_in_chars() {
        let ok = SendMessageRequest {
            body: "あ".repeat(MAX_MESSAGE_LEN),
        };
        assert!(ok.validate(&()).is_ok());

        let too_long = SendMessageRequest {
            body: "a".repeat(MAX_MESSAGE_LEN + 1),
        };
        assert!(too_long.validate(&()).is_err());

        let empty = SendMessageRequest {
            body: String::new(),
        };
        assert!(empty.validate(&()).is_err());
    }
}
