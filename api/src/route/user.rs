use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{
    change_role, find_user_by_firebase_uid, get_current_user, list_users, update_current_user,
};

pub fn build_user_router() -> Router<AppRegistry> {
    let users_routers = Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user).put(update_current_user))
        .route("/firebase/:firebase_uid", get(find_user_by_firebase_uid))
        .route("/:user_id/role", put(change_role));

    Router::new().nest("/users", users_routers)
}
