use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    availability::{delete_venue_availability, set_venue_availability, show_venue_calendar},
    venue::{register_venue, show_my_venues, show_venue, show_venue_list, update_venue},
};

pub fn build_venue_routers() -> Router<AppRegistry> {
    let venues_routers = Router::new()
        .route("/", post(register_venue))
        .route("/", get(show_venue_list))
        .route("/mine", get(show_my_venues))
        .route("/:venue_id", get(show_venue))
        .route("/:venue_id", put(update_venue))
        .route("/:venue_id/availability", get(show_venue_calendar))
        .route("/:venue_id/availability", put(set_venue_availability))
        .route(
            "/:venue_id/availability/:date",
            delete(delete_venue_availability),
        );

    Router::new().nest("/venues", venues_routers)
}
