pub mod auth;
mod connections;
mod dashboard;
mod directory;
pub mod error;
mod mentorship;
mod profiles;
pub mod rate_limit;
mod validation;


use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Sign-up and sign-in (public, tighter rate limit)
    let public_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/signin", post(auth::signin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_auth,
        ));

    let protected_routes = Router::new()
        // Session
        .route("/api/auth/signout", post(auth::signout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/users/:id/role", get(auth::user_role))
        // Profile
        .route(
            "/api/profile",
            get(profiles::get_profile).put(profiles::save_profile),
        )
        .route("/api/profile/avatar", put(profiles::update_avatar))
        // Views
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/directory", get(directory::list_directory))
        // Connections
        .route(
            "/api/connections",
            get(connections::list_connections).post(connections::create_connection),
        )
        .route(
            "/api/connections/:id/status",
            put(connections::update_connection_status),
        )
        // Mentorship
        .route(
            "/api/mentorship-requests",
            get(mentorship::list_mentorship_requests).post(mentorship::create_mentorship_request),
        )
        .route(
            "/api/mentorship-requests/:id/status",
            put(mentorship::update_mentorship_status),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_api,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
