use axum::{Router, routing::get};

pub mod accounts;
pub mod common;
pub mod invoices;
pub mod system;

/// Routes that require a signed-in user; mounted under `/dashboard`.
pub fn dashboard_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/invoices", invoices::router())
}

/// Routes open to anonymous clients.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(accounts::router())
}
