//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params)
//! 2. Delegates to the service layer
//! 3. Returns an HTTP response (JSON, status code)

/// Service and database health probe
pub mod health;
/// Payment transaction endpoints
pub mod payments;
