use adapter::rate_limit::LimitedAction;
use axum::{extract::State, Json};
use kernel::model::assistant::{
    AssistantReply, Relevance, RelevanceFilter, GREETING_REPLY, OFF_TOPIC_REPLY,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{AppJson, AuthorizedUser},
    model::assistant::{AssistantChatRequest, AssistantChatResponse},
};

pub async fn chat(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<AssistantChatRequest>,
) -> AppResult<Json<AssistantChatResponse>> {
    registry
        .rate_limiter()
        .acquire(LimitedAction::Assistant, &user.id().to_string())
        .await?;

    let config = registry.assistant_config();
    let relevance = RelevanceFilter::new(config.max_message_chars).classify(&req.message)?;
    let reply = match relevance {
        Relevance::Greeting => AssistantReply {
            reply: GREETING_REPLY.to_string(),
            relevant: true,
        },
        Relevance::OffTopic => AssistantReply {
            reply: OFF_TOPIC_REPLY.to_string(),
            relevant: false,
        },
        Relevance::Relevant => AssistantReply {
            reply: registry
                .assistant_gateway()
                .complete(req.message.trim())
                .await?,
            relevant: true,
        },
    };

    Ok(Json(reply.into()))
}
