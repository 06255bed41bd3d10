//! Error types and HTTP error translation.
//!
//! Every failure in the application is a typed [`AppError`] variant raised at
//! the point of detection. Translation to HTTP happens in exactly one place:
//! the [`IntoResponse`] implementation picks the status and public message,
//! and [`error_envelope_layer`] stamps the final JSON envelope (timestamp,
//! message, request path, optional field-error list) onto the response.

use axum::{
    Json,
    extract::{
        Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::models::enums::PaymentType;

/// Application-wide error type.
///
/// # Status Code Mapping
///
/// - Validation, malformed body, bad parameter, calendar-invalid date-time,
///   installments business rule, unrecognized wire labels → 400 Bad Request
/// - Duplicate transaction id → 409 Conflict
/// - Unknown transaction id → 404 Not Found
/// - Database failures and unrecognized stored enum codes → 500 Internal
///   Server Error (details are logged, never sent to the caller)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (connection, query, migration).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// One or more request fields violated the validation rules. Carries the
    /// full collected set, rendered as a `field_errors` list.
    #[error("Validation failed for one or more fields.")]
    Validation(ValidationErrors),

    /// The request body could not be read as the expected JSON shape.
    #[error("{0}")]
    MalformedBody(String),

    /// A path parameter was missing or failed to parse.
    #[error("{0}")]
    InvalidParameter(String),

    /// The date-time text matched the structural pattern but is not a real
    /// calendar date-time (e.g. day 31 of February).
    #[error("date_time is not a valid calendar date-time: {0}")]
    InvalidDateTime(#[from] chrono::ParseError),

    /// A field the validation layer guarantees was absent anyway; surfaces as
    /// a client error instead of a panic.
    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),

    /// The cross-field business rule: single payments cannot be split.
    #[error("Installments quantity must be lower than 2 when payment type is SINGLE_PAYMENT")]
    InvalidInstallmentsForPaymentType,

    /// A record with the same id already exists.
    #[error("Transaction with id '{0}' already exists")]
    DuplicateTransactionId(String),

    /// No record with the given id.
    #[error("Transaction not found for id: {0}")]
    PaymentNotFound(String),

    /// A status label that matches no variant.
    #[error("Invalid transaction status: {0}")]
    UnknownStatusLabel(String),

    /// A stored status code that matches no variant — corrupt data.
    #[error("Invalid transaction status code: {0}")]
    UnknownStatusCode(i32),

    /// A payment-type label that matches no variant.
    #[error("Invalid payment method type: {0}")]
    UnknownPaymentTypeLabel(String),

    /// A stored payment-type code that matches no variant — corrupt data.
    #[error("Invalid payment method type code: {0}")]
    UnknownPaymentTypeCode(i32),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::MalformedBody(_)
            | AppError::InvalidParameter(_)
            | AppError::InvalidDateTime(_)
            | AppError::MissingField(_)
            | AppError::InvalidInstallmentsForPaymentType
            | AppError::UnknownStatusLabel(_)
            | AppError::UnknownPaymentTypeLabel(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateTransactionId(_) => StatusCode::CONFLICT,
            AppError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::UnknownStatusCode(_)
            | AppError::UnknownPaymentTypeCode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translate an unreadable request body into the 400 taxonomy.
    ///
    /// When the root cause is an unrecognized payment-type label, the hint
    /// listing the allowed values is appended, since that is by far the most
    /// common way callers get the body wrong.
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if message.contains("Invalid payment method type") {
            AppError::MalformedBody(format!(
                "{message} Allowed values: {}.",
                PaymentType::ALLOWED_LABELS
            ))
        } else {
            AppError::MalformedBody(message)
        }
    }

    /// Translate a path-extraction failure into a 400 naming the parameter.
    pub fn from_path_rejection(rejection: PathRejection) -> Self {
        AppError::InvalidParameter(format!(
            "Path parameter 'id' of type String is invalid: {}",
            rejection.body_text()
        ))
    }
}

/// One entry of the `field_errors` list on a validation response.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// What [`error_envelope_layer`] needs to render the response body. The
/// `IntoResponse` impl stashes this in the response extensions because the
/// request path is only known to the middleware.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub field_errors: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 500s keep their detail out of the response; log it here instead
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let details = match &self {
            AppError::Validation(errors) => ErrorDetails {
                message: self.to_string(),
                field_errors: Some(flatten_field_errors(errors)),
            },
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => ErrorDetails {
                message: "An unexpected error occurred. Please contact support if the problem \
                          persists."
                    .to_string(),
                field_errors: None,
            },
            _ => ErrorDetails {
                message: self.to_string(),
                field_errors: None,
            },
        };

        let mut response = status.into_response();
        response.extensions_mut().insert(details);
        response
    }
}

/// Response-finishing middleware: turns the [`ErrorDetails`] extension left
/// by [`AppError::into_response`] into the error envelope every failure
/// response carries.
///
/// ```json
/// {
///   "timestamp": "2021-05-01T18:30:00+00:00",
///   "message": "Transaction not found for id: 42",
///   "path": "/payments/42"
/// }
/// ```
///
/// Validation failures additionally carry `field_errors`, a list of
/// `{ "field": ..., "message": ... }` objects.
pub async fn error_envelope_layer(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(details) = response.extensions().get::<ErrorDetails>().cloned() else {
        return response;
    };

    let status = response.status();
    let mut body = json!({
        "timestamp": Utc::now().to_rfc3339(),
        "message": details.message,
        "path": path,
    });
    if let Some(field_errors) = details.field_errors {
        body["field_errors"] = json!(field_errors);
    }

    (status, Json(body)).into_response()
}

/// Flatten validator's nested error tree into (field path, message) pairs,
/// e.g. `transaction.description.amount`.
pub fn flatten_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected = Vec::new();
    collect_field_errors(errors, "", &mut collected);
    collected
}

fn collect_field_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(violations) => {
                for violation in violations {
                    let message = violation
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("Invalid value for '{path}'"));
                    out.push(FieldError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, &path, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect_field_errors(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_the_taxonomy() {
        assert_eq!(
            AppError::PaymentNotFound("1".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DuplicateTransactionId("1".into())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidInstallmentsForPaymentType
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MalformedBody("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnknownStatusCode(9).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let response = AppError::UnknownStatusCode(97).into_response();
        let details = response.extensions().get::<ErrorDetails>().unwrap();
        assert!(!details.message.contains("97"));
        assert!(details.message.contains("unexpected error"));
    }

    #[test]
    fn messages_name_the_offending_id() {
        assert_eq!(
            AppError::DuplicateTransactionId("42".into()).to_string(),
            "Transaction with id '42' already exists"
        );
        assert_eq!(
            AppError::PaymentNotFound("42".into()).to_string(),
            "Transaction not found for id: 42"
        );
    }
}
