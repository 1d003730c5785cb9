//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores, auth provider and view cache behind one handle
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        sessions: services.sessions.clone(),
    };

    // Protected routes: require a valid session.
    let dashboard = routes::dashboard_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::session_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .nest("/dashboard", dashboard)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
