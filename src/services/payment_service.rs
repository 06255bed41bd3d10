//! Payment operations - core business logic for recording transactions.
//!
//! This service handles:
//! - Uniqueness enforcement on the caller-supplied transaction id
//! - Settlement number / authorization code generation at creation
//! - Lookup, listing, and reversal (cancel) semantics
//!
//! # Concurrency
//!
//! Operations are request-scoped; the only shared state is the database.
//! Creation pre-checks existence and then relies on the primary key as the
//! race-free guard. Cancel is an unlocked read-modify-write: concurrent
//! cancels converge on CANCELED, and a read racing a cancel may observe the
//! pre-cancel state.

use crate::{
    db::DbPool,
    error::AppError,
    models::{enums::TransactionStatus, payment::{PaymentRequest, PaymentResponse}, transaction::Transaction},
    services::{generator, translator},
};

/// Record (authorize) a new payment transaction.
///
/// # Process
///
/// 1. Reject ids that already exist (Conflict)
/// 2. Allocate the next settlement number from the durable sequence
/// 3. Generate the authorization code
/// 4. Translate the request into a record with status AUTHORIZED
/// 5. Insert; a unique-violation from a racing create maps to the same
///    Conflict as the pre-check
///
/// # Returns
///
/// The full response, including the generated settlement number,
/// authorization code, and AUTHORIZED status.
pub async fn create_payment(
    pool: &DbPool,
    request: PaymentRequest,
) -> Result<PaymentResponse, AppError> {
    let id = request
        .transaction
        .as_ref()
        .and_then(|transaction| transaction.id.clone())
        .ok_or(AppError::MissingField("transaction.id"))?;

    // Fast pre-check; the primary key below is the real guard under races
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM transactions WHERE id = $1)")
            .bind(&id)
            .fetch_one(pool)
            .await?;
    if exists {
        return Err(AppError::DuplicateTransactionId(id));
    }

    let nsu = generator::next_settlement_number(pool).await?;
    let authorization_code = generator::authorization_code();
    let transaction = translator::to_transaction(request, nsu, authorization_code)?;

    let inserted = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            id, card_number, amount, date_time, establishment,
            nsu, authorization_code, status, payment_type, installments
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&transaction.id)
    .bind(&transaction.card_number)
    .bind(transaction.amount)
    .bind(transaction.date_time)
    .bind(&transaction.establishment)
    .bind(&transaction.nsu)
    .bind(&transaction.authorization_code)
    .bind(transaction.status)
    .bind(transaction.payment_type)
    .bind(transaction.installments)
    .fetch_one(pool)
    .await;

    let stored = match inserted {
        Ok(stored) => stored,
        // Two creates raced past the pre-check; the primary key settled it
        Err(sqlx::Error::Database(db_error)) if db_error.is_unique_violation() => {
            return Err(AppError::DuplicateTransactionId(transaction.id));
        }
        Err(error) => return Err(error.into()),
    };

    tracing::info!(id = %stored.id, nsu = %stored.nsu, "transaction authorized");

    translator::to_payment_response(&stored)
}

/// Look up a single transaction by id.
///
/// # Errors
///
/// - `PaymentNotFound`: no record with this id
pub async fn find_payment_by_id(pool: &DbPool, id: &str) -> Result<PaymentResponse, AppError> {
    let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::PaymentNotFound(id.to_string()))?;

    translator::to_payment_response(&transaction)
}

/// List every recorded transaction, in the store's natural order (no sort is
/// imposed).
pub async fn list_all_payments(pool: &DbPool) -> Result<Vec<PaymentResponse>, AppError> {
    let transactions = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions")
        .fetch_all(pool)
        .await?;

    transactions.iter().map(translator::to_payment_response).collect()
}

/// Reverse (cancel) a previously authorized transaction.
///
/// Idempotent: canceling an already-CANCELED record returns the current state
/// without writing. The status flip is an unlocked read-modify-write — see
/// the module docs for the accepted race.
///
/// # Errors
///
/// - `PaymentNotFound`: no record with this id
pub async fn cancel_payment(pool: &DbPool, id: &str) -> Result<PaymentResponse, AppError> {
    let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::PaymentNotFound(id.to_string()))?;

    // Already canceled: return the current state unchanged, no write
    if transaction.status == TransactionStatus::Canceled.code() {
        return translator::to_payment_response(&transaction);
    }

    let updated = sqlx::query_as::<_, Transaction>(
        "UPDATE transactions SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(TransactionStatus::Canceled.code())
    .bind(id)
    .fetch_one(pool)
    .await?;

    tracing::info!(id = %updated.id, "transaction canceled");

    translator::to_payment_response(&updated)
}
