use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    availability::{delete_vendor_availability, set_vendor_availability, show_vendor_calendar},
    vendor::{register_vendor, show_my_vendor, show_vendor, show_vendor_list, update_vendor},
};

pub fn build_vendor_routers() -> Router<AppRegistry> {
    let vendors_routers = Router::new()
        .route("/", post(register_vendor))
        .route("/", get(show_vendor_list))
        .route("/mine", get(show_my_vendor))
        .route("/:vendor_id", get(show_vendor))
        .route("/:vendor_id", put(update_vendor))
        .route("/:vendor_id/availability", get(show_vendor_calendar))
        .route("/:vendor_id/availability", put(set_vendor_availability))
        .route(
            "/:vendor_id/availability/:date",
            delete(delete_vendor_availability),
        );

    Router::new().nest("/vendors", vendors_routers)
}
