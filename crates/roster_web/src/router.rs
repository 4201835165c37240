//! Route table.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/students", get(handlers::list_students))
        .route(
            "/students/add",
            get(handlers::show_add_form).post(handlers::submit_add),
        )
        .route(
            "/students/:id/edit",
            get(handlers::show_edit_form).post(handlers::submit_edit),
        )
        .route("/students/:id/delete", post(handlers::delete_student))
        .with_state(state)
}
