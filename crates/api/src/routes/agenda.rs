use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/create-slot", post(handlers::agenda::create_slot))
        .route(
            "/api/list-available-slots",
            get(handlers::agenda::list_available_slots),
        )
        .route(
            "/api/book-appointment",
            post(handlers::agenda::book_appointment),
        )
        .route(
            "/api/list-appointments",
            get(handlers::agenda::list_appointments),
        )
}
