//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers:
//! identifier generation, wire/storage translation, and the payment
//! operations themselves.

/// Settlement number and authorization code generation
pub mod generator;
/// Create/find/list/cancel orchestration
pub mod payment_service;
/// Request ↔ entity ↔ response mapping
pub mod translator;
