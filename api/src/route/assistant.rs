use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::assistant::chat;

pub fn build_assistant_routers() -> Router<AppRegistry> {
    Router::new().nest("/assistant", Router::new().route("/chat", post(chat)))
}
