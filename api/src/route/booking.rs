use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    book_vendor, book_venue, show_booking, show_incoming_bookings, show_my_bookings,
    update_booking_status,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let bookings_routers = Router::new()
        .route("/", get(show_my_bookings))
        .route("/vendor", post(book_vendor))
        .route("/venue", post(book_venue))
        .route("/incoming", get(show_incoming_bookings))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id/status", put(update_booking_status));

    Router::new().nest("/bookings", bookings_routers)
}
