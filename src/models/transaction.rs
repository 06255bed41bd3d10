//! Stored transaction entity.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// A transaction record as persisted in the `transactions` table.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each record:
/// - Is keyed by the caller-supplied numeric `id` (primary key)
/// - Carries a settlement number (`nsu`) and authorization code assigned once
///   at creation and never changed afterwards
/// - Stores status and payment type as their stable integer codes
///   (see [`crate::models::enums`])
///
/// `status` is the only column the cancel operation rewrites; records are
/// never deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transaction {
    /// Caller-supplied identifier, ASCII digits only
    pub id: String,

    /// Card number as received (expected masked; not validated beyond non-blank)
    pub card_number: String,

    /// Charged amount, `NUMERIC(10,2)` — never floats
    pub amount: Decimal,

    /// When the transaction happened; the wire format carries no zone
    pub date_time: NaiveDateTime,

    /// Merchant that originated the charge, up to 100 characters
    pub establishment: String,

    /// System-generated settlement number, 10 digits zero-padded
    pub nsu: String,

    /// System-generated 9-character authorization code
    pub authorization_code: String,

    /// [`TransactionStatus`](crate::models::enums::TransactionStatus) code
    pub status: i32,

    /// [`PaymentType`](crate::models::enums::PaymentType) code
    pub payment_type: i32,

    /// Number of installments, at least 1
    pub installments: i32,
}
