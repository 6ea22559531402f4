use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::chat::{open_conversation, send_message, show_conversations, show_messages};

pub fn build_chat_routers() -> Router<AppRegistry> {
    let chat_routers = Router::new()
        .route("/conversations", get(show_conversations).post(open_conversation))
        .route(
            "/conversations/:conversation_id/messages",
            get(show_messages).post(send_message),
        );

    Router::new().nest("/chat", chat_routers)
}
