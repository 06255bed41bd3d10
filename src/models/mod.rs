//! Data models: database entities and API request/response types.

/// Status and payment-type enumerations (code/label duality)
pub mod enums;
/// Wire request/response shapes and their validation rules
pub mod payment;
/// Stored transaction entity
pub mod transaction;
