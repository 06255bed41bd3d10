//! Wire ↔ storage translation for payment transactions.
//!
//! Pure mapping in both directions. Building a record also enforces the one
//! cross-field business rule (installments vs. payment type) — it lives here
//! and nowhere else, so the check cannot diverge between layers.

use chrono::NaiveDateTime;

use crate::{
    error::AppError,
    models::{
        enums::{PaymentType, TransactionStatus},
        payment::{
            DescriptionResponse, PaymentMethodResponse, PaymentRequest, PaymentResponse,
            TransactionResponse,
        },
        transaction::Transaction,
    },
};

/// Fixed date-time pattern shared by parsing and formatting
/// (`dd/MM/yyyy HH:mm:ss`).
pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Build a storable transaction from a create request.
///
/// The settlement number and authorization code come from the generators via
/// the operations layer and are assigned here exactly once. Status always
/// starts as AUTHORIZED.
///
/// # Errors
///
/// - `InvalidDateTime`: the text matched the structural pattern but is not a
///   real calendar date-time (e.g. day 31 of February) — validation is
///   deliberately two-stage
/// - `InvalidInstallmentsForPaymentType`: single payment split into more than
///   one installment
/// - `MissingField`: a field validation guarantees was absent anyway
pub fn to_transaction(
    request: PaymentRequest,
    nsu: String,
    authorization_code: String,
) -> Result<Transaction, AppError> {
    let transaction = required(request.transaction, "transaction")?;
    let description = required(transaction.description, "transaction.description")?;
    let payment_method = required(transaction.payment_method, "transaction.payment_method")?;

    let date_time_text = required(description.date_time, "transaction.description.date_time")?;
    let date_time = NaiveDateTime::parse_from_str(&date_time_text, DATE_TIME_FORMAT)?;

    let payment_type = required(payment_method.kind, "transaction.payment_method.type")?;
    let installments = required(
        payment_method.installments,
        "transaction.payment_method.installments",
    )?;
    check_installments(payment_type, installments)?;

    Ok(Transaction {
        id: required(transaction.id, "transaction.id")?,
        card_number: required(transaction.card_number, "transaction.card_number")?,
        amount: required(description.amount, "transaction.description.amount")?,
        date_time,
        establishment: required(description.establishment, "transaction.description.establishment")?,
        nsu,
        authorization_code,
        status: TransactionStatus::Authorized.code(),
        payment_type: payment_type.code(),
        installments,
    })
}

/// The one authoritative cross-field rule: a single payment cannot be split
/// into more than one installment.
pub fn check_installments(payment_type: PaymentType, installments: i32) -> Result<(), AppError> {
    if installments > 1 && payment_type == PaymentType::SinglePayment {
        return Err(AppError::InvalidInstallmentsForPaymentType);
    }
    Ok(())
}

/// Translate a stored transaction back to the wire response shape.
///
/// Status and payment-type codes resolve to their labels; an unrecognized
/// stored code is a hard failure, never a default.
pub fn to_payment_response(transaction: &Transaction) -> Result<PaymentResponse, AppError> {
    let status = TransactionStatus::from_code(transaction.status)?;
    let payment_type = PaymentType::from_code(transaction.payment_type)?;

    Ok(PaymentResponse {
        transaction: TransactionResponse {
            card_number: transaction.card_number.clone(),
            id: transaction.id.clone(),
            description: DescriptionResponse {
                amount: transaction.amount,
                date_time: transaction.date_time.format(DATE_TIME_FORMAT).to_string(),
                establishment: transaction.establishment.clone(),
                nsu: transaction.nsu.clone(),
                authorization_code: transaction.authorization_code.clone(),
                status,
            },
            payment_method: PaymentMethodResponse {
                kind: payment_type,
                installments: transaction.installments,
            },
        },
    })
}

/// Fields are validated before translation reaches them; a miss here still
/// surfaces as a client error rather than a panic.
fn required<T>(value: Option<T>, field: &'static str) -> Result<T, AppError> {
    value.ok_or(AppError::MissingField(field))
}
