use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::{
    chat::{MessageQuery, SendMessage},
    id::ConversationId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppJson, AppPath, AppQuery, AuthorizedUser},
    model::chat::{
        ConversationResponse, ConversationsResponse, MessageListQuery, MessageResponse,
        MessagesResponse, OpenConversationRequest, SendMessageRequest,
    },
};

pub async fn open_conversation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<OpenConversationRequest>,
) -> AppResult<Json<ConversationResponse>> {
    registry
        .chat_repository()
        .open_conversation(user.id(), req.participant_id)
        .await
        .map(|c| Json(ConversationResponse::for_viewer(c, user.id())))
}

pub async fn show_conversations(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ConversationsResponse>> {
    let items = registry
        .chat_repository()
        .find_conversations(user.id())
        .await?
        .into_iter()
        .map(|c| ConversationResponse::for_viewer(c, user.id()))
        .collect();
    Ok(Json(ConversationsResponse { items }))
}

pub async fn show_messages(
    user: AuthorizedUser,
    AppPath(conversation_id): AppPath<ConversationId>,
    AppQuery(query): AppQuery<MessageListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessagesResponse>> {
    query.validate(&())?;

    registry
        .chat_repository()
        .find_conversation(conversation_id, user.id())
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("conversation {conversation_id} not found"))
        })?;

    registry
        .chat_repository()
        .find_messages(MessageQuery {
            conversation_id,
            before: query.before,
            limit: query.limit,
        })
        .await
        .map(MessagesResponse::from)
        .map(Json)
}

pub async fn send_message(
    user: AuthorizedUser,
    AppPath(conversation_id): AppPath<ConversationId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    req.validate(&())?;

    let message = registry
        .chat_repository()
        .send_message(SendMessage {
            conversation_id,
            sender_id: user.id(),
            body: req.body,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}
