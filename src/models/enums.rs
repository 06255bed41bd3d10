//! Transaction status and payment type enumerations.
//!
//! Both enums carry a stable integer code (what the database stores) and a
//! display label (what travels on the wire). Lookups by code or label are
//! fallible: an unrecognized value is a hard error, never a default.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// Lifecycle status of a transaction.
///
/// New transactions start as `Authorized`. The only legal transition is
/// `Authorized` → `Canceled` (reversal). `Denied` is reserved for future
/// flows and never produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Authorized,
    Denied,
    Canceled,
}

impl TransactionStatus {
    /// Stable integer code stored in the `status` column.
    pub fn code(self) -> i32 {
        match self {
            TransactionStatus::Authorized => 1,
            TransactionStatus::Denied => 2,
            TransactionStatus::Canceled => 3,
        }
    }

    /// Display label used on the wire.
    pub fn label(self) -> &'static str {
        match self {
            TransactionStatus::Authorized => "AUTHORIZED",
            TransactionStatus::Denied => "DENIED",
            TransactionStatus::Canceled => "CANCELED",
        }
    }

    /// Resolve a stored status code back to its variant.
    pub fn from_code(code: i32) -> Result<Self, AppError> {
        match code {
            1 => Ok(TransactionStatus::Authorized),
            2 => Ok(TransactionStatus::Denied),
            3 => Ok(TransactionStatus::Canceled),
            other => Err(AppError::UnknownStatusCode(other)),
        }
    }

    /// Resolve a wire label to its variant (case-insensitive).
    pub fn from_label(label: &str) -> Result<Self, AppError> {
        [
            TransactionStatus::Authorized,
            TransactionStatus::Denied,
            TransactionStatus::Canceled,
        ]
        .into_iter()
        .find(|status| status.label().eq_ignore_ascii_case(label))
        .ok_or_else(|| AppError::UnknownStatusLabel(label.to_string()))
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// How the charge is financed.
///
/// `SinglePayment` is a one-shot charge; the installment variants distinguish
/// whether the merchant or the card issuer finances the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    SinglePayment,
    MerchantInstallments,
    IssuerInstallments,
}

impl PaymentType {
    /// Every wire label, for the malformed-body hint.
    pub const ALLOWED_LABELS: &'static str =
        "SINGLE_PAYMENT, MERCHANT_INSTALLMENTS, ISSUER_INSTALLMENTS";

    /// Stable integer code stored in the `payment_type` column.
    pub fn code(self) -> i32 {
        match self {
            PaymentType::SinglePayment => 1,
            PaymentType::MerchantInstallments => 2,
            PaymentType::IssuerInstallments => 3,
        }
    }

    /// Display label used on the wire.
    pub fn label(self) -> &'static str {
        match self {
            PaymentType::SinglePayment => "SINGLE_PAYMENT",
            PaymentType::MerchantInstallments => "MERCHANT_INSTALLMENTS",
            PaymentType::IssuerInstallments => "ISSUER_INSTALLMENTS",
        }
    }

    /// Resolve a stored payment-type code back to its variant.
    pub fn from_code(code: i32) -> Result<Self, AppError> {
        match code {
            1 => Ok(PaymentType::SinglePayment),
            2 => Ok(PaymentType::MerchantInstallments),
            3 => Ok(PaymentType::IssuerInstallments),
            other => Err(AppError::UnknownPaymentTypeCode(other)),
        }
    }

    /// Resolve a wire label to its variant (case-insensitive).
    pub fn from_label(label: &str) -> Result<Self, AppError> {
        [
            PaymentType::SinglePayment,
            PaymentType::MerchantInstallments,
            PaymentType::IssuerInstallments,
        ]
        .into_iter()
        .find(|kind| kind.label().eq_ignore_ascii_case(label))
        .ok_or_else(|| AppError::UnknownPaymentTypeLabel(label.to_string()))
    }
}

impl Serialize for PaymentType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// Requests carry payment types as labels; an unrecognized label fails the
/// whole body read (the error handler appends the allowed-values hint).
impl<'de> Deserialize<'de> for PaymentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        PaymentType::from_label(&label).map_err(serde::de::Error::custom)
    }
}
