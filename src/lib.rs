//! Payment transaction recording service.
//!
//! Accepts payment authorization requests, persists them with a generated
//! settlement number (nsu) and authorization code, and supports lookup,
//! listing, and reversal (estorno).
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries, embedded migrations)
//! - **Validation**: validator-derived field rules, violations collected per
//!   request
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::db::DbPool;

/// Build the application router.
///
/// Kept separate from `main` so tests can drive the full HTTP surface
/// in-process.
pub fn app(pool: DbPool) -> Router {
    Router::new()
        // Public health probe
        .route("/health", get(handlers::health::health_check))
        // Payment routes
        .route("/payments", post(handlers::payments::create_payment))
        .route(
            "/payments/listAllPayments",
            get(handlers::payments::list_all_payments),
        )
        .route(
            "/payments/{id}",
            get(handlers::payments::find_payment_by_id),
        )
        .route(
            "/payments/{id}/estorno",
            post(handlers::payments::cancel_payment),
        )
        // Stamp timestamp/path onto every error body at one boundary
        .layer(axum_middleware::from_fn(error::error_envelope_layer))
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share database pool with all handlers via State extraction
        .with_state(pool)
}
