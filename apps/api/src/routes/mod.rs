pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::bookmarks;
use crate::places;
use crate::reports;
use crate::state::AppState;
use crate::users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Places
        .route("/api/v1/places", get(places::handlers::handle_list_places))
        .route("/api/v1/places/:id", get(places::handlers::handle_get_place))
        // Reports
        .route(
            "/api/v1/reports",
            post(reports::handlers::handle_submit_report),
        )
        // Bookmarks
        .route(
            "/api/v1/users/:user_id/bookmarks",
            get(bookmarks::handle_list_bookmarks),
        )
        .route(
            "/api/v1/users/:user_id/bookmarks/:place_id",
            put(bookmarks::handle_add_bookmark).delete(bookmarks::handle_remove_bookmark),
        )
        // Pass card
        .route("/api/v1/users/:user_id/pass", get(users::handle_get_pass))
        .route(
            "/api/v1/users/:user_id/points/history",
            get(users::handle_point_history),
        )
        .with_state(state)
}
