use axum::{middleware, routing::post, Router};
use registry::AppRegistry;

use crate::{
    handler::auth::{login, register},
    rate_limit::login_rate_limit,
};

pub fn build_auth_routers(registry: AppRegistry) -> Router<AppRegistry> {
    let login_router = Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(registry, login_rate_limit));

    let auth_routers = Router::new()
        .route("/register", post(register))
        .merge(login_router);

    Router::new().nest("/auth", auth_routers)
}
