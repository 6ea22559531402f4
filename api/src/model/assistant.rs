use kernel::model::assistant::AssistantReply;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantChatRequest {
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantChatResponse {
    pub reply: String,
    pub relevant: bool,
}

impl From<AssistantReply> for AssistantChatResponse {
    fn from(value: AssistantReply) -> Self {
        let AssistantReply { reply, relevant } = value;
        Self { reply, relevant }
    }
}
