use axum::Router;

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod system;

/// Router for all authenticated endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .nest("/api/dashboard", dashboard::router())
        .nest("/api/admin", admin::router())
}
