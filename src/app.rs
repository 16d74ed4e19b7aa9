use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/clients", get(handlers::list_clients).post(handlers::add_client))
        .route("/api/clients/by-phone/:phone", delete(handlers::delete_client))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/revenue", get(handlers::revenue))
        .route(
            "/api/reservations",
            get(handlers::list_reservations).post(handlers::add_reservation),
        )
        .route("/api/notifications", get(handlers::notifications))
        .route("/api/timeline", get(handlers::timeline))
        .route("/api/services", get(handlers::list_services).post(handlers::add_service))
        .route("/api/reviews", get(handlers::list_reviews).post(handlers::add_review))
        .route("/api/share", get(handlers::share))
        .route("/api/events", get(handlers::events))
        .route("/export/clients.csv", get(handlers::export_clients))
        .route("/export/revenue.csv", get(handlers::export_revenue))
        .route("/export/reviews.csv", get(handlers::export_reviews))
        .with_state(state)
}
