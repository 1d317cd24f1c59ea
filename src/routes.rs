// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use tower_http::trace::TraceLayer;
use serde_json::json;

use crate::{
    handler::{
        assignments::assignments_handler,
        auth::auth_handler,
        jobs::jobs_handler,
        messages::messages_handler,
        notifications::notifications_handler,
        reports::reports_handler,
        templates::templates_handler,
        users::users_handler,
    },
    middleware::auth,
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest(
            "/users",
            users_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest(
            "/jobs",
            jobs_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest(
            "/assignments",
            assignments_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest(
            "/templates",
            templates_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest(
            "/reports",
            reports_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest(
            "/notifications",
            notifications_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest(
            "/messages",
            messages_handler()
                .layer(middleware::from_fn(auth))
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
