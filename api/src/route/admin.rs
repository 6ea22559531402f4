use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::admin::{decide_vendor, decide_venue, show_pending_vendors, show_pending_venues};

pub fn build_admin_routers() -> Router<AppRegistry> {
    let applications_routers = Router::new()
        .route("/vendors", get(show_pending_vendors))
        .route("/vendors/:vendor_id", put(decide_vendor))
        .route("/venues", get(show_pending_venues))
        .route("/venues/:venue_id", put(decide_venue));

    Router::new().nest("/admin/applications", applications_routers)
}
