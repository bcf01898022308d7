//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use ferrobank_auth::TokenSigner;
use ferrobank_infra::LedgerStore;

use crate::{config::AppConfig, middleware};

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared state for route handlers.
pub struct AppServices {
    pub store: Arc<dyn LedgerStore>,
    pub signer: Arc<TokenSigner>,
    pub config: AppConfig,
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: AppConfig, store: Arc<dyn LedgerStore>) -> Router {
    let signer = Arc::new(TokenSigner::new(&config.auth));
    let auth_state = middleware::AuthState {
        signer: Arc::clone(&signer),
        store: Arc::clone(&store),
    };

    let services = Arc::new(AppServices {
        store,
        signer,
        config,
    });

    // Protected routes: require a verified bearer token.
    let protected = routes::protected_router()
        .layer(Extension(Arc::clone(&services)))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/", get(routes::system::root))
        .route("/health", get(routes::system::health))
        .nest(
            "/api/auth",
            routes::auth::router().layer(Extension(services)),
        )
        .merge(protected)
        .layer(ServiceBuilder::new())
}
