//! Payment HTTP handlers.
//!
//! This module implements the payment-related API endpoints:
//! - POST /payments - Authorize and record a payment transaction
//! - GET /payments/listAllPayments - List every recorded transaction
//! - GET /payments/:id - Look up a transaction by id
//! - POST /payments/:id/estorno - Reverse (cancel) a transaction

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use validator::Validate;

use crate::{
    db::DbPool,
    error::AppError,
    models::payment::{PaymentRequest, PaymentResponse},
    services::payment_service,
};

/// Authorize and record a payment transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "transaction": {
///     "card_number": "4444********1234",
///     "id": "100023568900001",
///     "description": {
///       "amount": "500.50",
///       "date_time": "01/05/2021 18:30:00",
///       "establishment": "PetShop Mundo cão"
///     },
///     "payment_method": {
///       "type": "SINGLE_PAYMENT",
///       "installments": 1
///     }
///   }
/// }
/// ```
///
/// # Response (201 Created)
///
/// The full transaction, including the generated settlement number (nsu),
/// authorization code, and AUTHORIZED status.
///
/// # Errors
///
/// - **400**: unreadable body, field validation failures (with a
///   `field_errors` list), calendar-invalid date-time, or a single payment
///   split into installments
/// - **409**: a transaction with this id already exists
pub async fn create_payment(
    State(pool): State<DbPool>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    // Unreadable bodies get the 400 taxonomy (with the payment-type hint)
    let Json(request) = payload.map_err(AppError::from_json_rejection)?;

    // Collect every field violation before any business logic runs
    request.validate().map_err(AppError::Validation)?;

    let response = payment_service::create_payment(&pool, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List every recorded transaction.
///
/// # Response (200 OK)
///
/// Array of full transaction responses (may be empty), in the store's
/// natural order.
pub async fn list_all_payments(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let responses = payment_service::list_all_payments(&pool).await?;
    Ok(Json(responses))
}

/// Look up a transaction by id.
///
/// # Response
///
/// - **200 OK**: the transaction
/// - **404**: no transaction with this id
pub async fn find_payment_by_id(
    State(pool): State<DbPool>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<PaymentResponse>, AppError> {
    let Path(id) = id.map_err(AppError::from_path_rejection)?;
    let response = payment_service::find_payment_by_id(&pool, &id).await?;
    Ok(Json(response))
}

/// Reverse (cancel) a transaction.
///
/// # Response
///
/// - **200 OK**: the updated transaction — or the unchanged one when it was
///   already canceled (the operation is idempotent)
/// - **404**: no transaction with this id
pub async fn cancel_payment(
    State(pool): State<DbPool>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<PaymentResponse>, AppError> {
    let Path(id) = id.map_err(AppError::from_path_rejection)?;
    let response = payment_service::cancel_payment(&pool, &id).await?;
    Ok(Json(response))
}
