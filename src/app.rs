use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/users", get(handlers::list_users).post(handlers::add_user))
        .route("/api/users/:id", get(handlers::get_user).delete(handlers::delete_user))
        .route("/api/users/:id/profile", put(handlers::update_profile))
        .route("/api/users/:id/stats", get(handlers::user_stats))
        .route("/api/users/:id/reset-streak", post(handlers::reset_streak))
        .route(
            "/api/exercises",
            get(handlers::list_exercises).post(handlers::add_exercise),
        )
        .route("/api/exercises/:id", delete(handlers::delete_exercise))
        .route("/api/weights", get(handlers::list_weights).post(handlers::add_weight))
        .route("/api/weights/latest", get(handlers::latest_weight))
        .route("/api/weights/:id", delete(handlers::delete_weight))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/api/streaks/sweep", post(handlers::sweep_streaks))
        .with_state(state)
}
