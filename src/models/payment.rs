//! Payment wire models: request DTOs with validation rules, response DTOs.
//!
//! # Request Shape
//!
//! ```json
//! {
//!   "transaction": {
//!     "card_number": "4444********1234",
//!     "id": "100023568900001",
//!     "description": {
//!       "amount": "50.00",
//!       "date_time": "01/05/2021 18:30:00",
//!       "establishment": "PetShop Mundo cão"
//!     },
//!     "payment_method": {
//!       "type": "SINGLE_PAYMENT",
//!       "installments": 1
//!     }
//!   }
//! }
//! ```
//!
//! Every request field is an `Option` with a `required` rule, so missing
//! fields land in the same collected field-error list as range and pattern
//! violations instead of aborting the body read one field at a time.
//!
//! Response structs are declared in wire order; serde emits keys in
//! declaration order, which is the compatibility contract.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::enums::{PaymentType, TransactionStatus};

/// Structural pattern for the date-time text: two-digit day and month,
/// four-digit year, two-digit time parts. Calendar validity is deliberately
/// not checked here — the translator's parse step rejects impossible dates
/// as a separate failure.
static DATE_TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}$").unwrap());

/// Transaction ids are ASCII digits only.
static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Request envelope for `POST /payments`.
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentRequest {
    #[validate(required(message = "Transaction is required"), nested)]
    pub transaction: Option<TransactionRequest>,
}

/// The transaction block of a create request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TransactionRequest {
    #[validate(
        required(message = "Card number is required"),
        length(min = 1, message = "Card number is required")
    )]
    pub card_number: Option<String>,

    #[validate(
        required(message = "Id is required"),
        length(min = 1, message = "Id is required"),
        regex(path = *ID_PATTERN, message = "id must contain only numeric digits")
    )]
    pub id: Option<String>,

    #[validate(required(message = "Description is required"), nested)]
    pub description: Option<DescriptionRequest>,

    #[validate(required(message = "Payment method is required"), nested)]
    pub payment_method: Option<PaymentMethodRequest>,
}

/// Charge details of a create request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct DescriptionRequest {
    /// Decimal string or JSON number; stored as `NUMERIC(10,2)`
    #[validate(
        required(message = "Amount is required"),
        custom(function = validate_amount)
    )]
    pub amount: Option<Decimal>,

    /// Text in `dd/MM/yyyy HH:mm:ss`
    #[validate(
        required(message = "Date-time is required"),
        regex(
            path = *DATE_TIME_PATTERN,
            message = "date_time must be in the format dd/MM/yyyy HH:mm:ss"
        )
    )]
    pub date_time: Option<String>,

    #[validate(
        required(message = "Establishment is required"),
        length(min = 1, max = 100, message = "establishment must be between 1 and 100 characters")
    )]
    pub establishment: Option<String>,
}

/// How the charge is financed.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PaymentMethodRequest {
    /// Wire key is `type`; unrecognized labels fail at deserialization with
    /// an allowed-values hint (see [`crate::error`])
    #[serde(rename = "type")]
    #[validate(required(message = "Payment type is required"))]
    pub kind: Option<PaymentType>,

    #[validate(
        required(message = "Installments is required"),
        range(min = 1, message = "installments must be at least 1")
    )]
    pub installments: Option<i32>,
}

/// Amount rule: at least 0.01, at most 8 integer digits and 2 fraction digits
/// (the storage side is `NUMERIC(10,2)`).
fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < Decimal::new(1, 2) {
        return Err(amount_error("amount must be at least 0.01"));
    }
    if amount.normalize().scale() > 2 {
        return Err(amount_error("amount must have at most 2 fraction digits"));
    }
    if amount.trunc() >= Decimal::from(100_000_000_u32) {
        return Err(amount_error("amount must have at most 8 integer digits"));
    }
    Ok(())
}

fn amount_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("amount");
    error.message = Some(message.into());
    error
}

/// Response envelope returned by every payment endpoint.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub transaction: TransactionResponse,
}

/// The transaction block of a response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub card_number: String,
    pub id: String,
    pub description: DescriptionResponse,
    pub payment_method: PaymentMethodResponse,
}

/// Charge details of a response, including the generated settlement number,
/// authorization code, and current status.
#[derive(Debug, Serialize)]
pub struct DescriptionResponse {
    pub amount: Decimal,
    pub date_time: String,
    pub establishment: String,
    pub nsu: String,
    pub authorization_code: String,
    pub status: TransactionStatus,
}

/// Payment method block of a response.
#[derive(Debug, Serialize)]
pub struct PaymentMethodResponse {
    #[serde(rename = "type")]
    pub kind: PaymentType,
    pub installments: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::flatten_field_errors;
    use serde_json::json;

    fn valid_request() -> PaymentRequest {
        serde_json::from_value(json!({
            "transaction": {
                "card_number": "4444********1234",
                "id": "100023568900001",
                "description": {
                    "amount": "50.00",
                    "date_time": "01/05/2021 18:30:00",
                    "establishment": "PetShop Mundo cão"
                },
                "payment_method": {
                    "type": "SINGLE_PAYMENT",
                    "installments": 1
                }
            }
        }))
        .unwrap()
    }

    fn violated_fields(request: &PaymentRequest) -> Vec<String> {
        let errors = request.validate().expect_err("expected validation failure");
        flatten_field_errors(&errors)
            .into_iter()
            .map(|field_error| field_error.field)
            .collect()
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn missing_transaction_is_reported() {
        let request = PaymentRequest { transaction: None };
        assert!(violated_fields(&request).contains(&"transaction".to_string()));
    }

    #[test]
    fn missing_leaf_fields_are_collected_together() {
        let request: PaymentRequest =
            serde_json::from_value(json!({ "transaction": {} })).unwrap();
        let fields = violated_fields(&request);
        for expected in [
            "transaction.card_number",
            "transaction.id",
            "transaction.description",
            "transaction.payment_method",
        ] {
            assert!(fields.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn blank_card_number_is_rejected() {
        let mut request = valid_request();
        request.transaction.as_mut().unwrap().card_number = Some(String::new());
        assert!(violated_fields(&request).contains(&"transaction.card_number".to_string()));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let mut request = valid_request();
        request.transaction.as_mut().unwrap().id = Some("12a34".to_string());
        assert!(violated_fields(&request).contains(&"transaction.id".to_string()));
    }

    #[test]
    fn amount_below_minimum_is_rejected() {
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .description
            .as_mut()
            .unwrap()
            .amount = Some(Decimal::new(0, 2));
        assert!(
            violated_fields(&request).contains(&"transaction.description.amount".to_string())
        );
    }

    #[test]
    fn amount_with_nine_integer_digits_is_rejected() {
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .description
            .as_mut()
            .unwrap()
            .amount = Some("123456789.00".parse().unwrap());
        assert!(
            violated_fields(&request).contains(&"transaction.description.amount".to_string())
        );
    }

    #[test]
    fn amount_with_three_fraction_digits_is_rejected() {
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .description
            .as_mut()
            .unwrap()
            .amount = Some("1.001".parse().unwrap());
        assert!(
            violated_fields(&request).contains(&"transaction.description.amount".to_string())
        );
    }

    #[test]
    fn amount_at_the_upper_bound_passes() {
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .description
            .as_mut()
            .unwrap()
            .amount = Some("99999999.99".parse().unwrap());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn date_time_check_is_pattern_only() {
        // Day 31 of February matches the pattern; the translator's parse step
        // is where it fails.
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .description
            .as_mut()
            .unwrap()
            .date_time = Some("31/02/2021 10:00:00".to_string());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn date_time_off_pattern_is_rejected() {
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .description
            .as_mut()
            .unwrap()
            .date_time = Some("2021-05-01 18:30:00".to_string());
        assert!(
            violated_fields(&request).contains(&"transaction.description.date_time".to_string())
        );
    }

    #[test]
    fn establishment_over_100_characters_is_rejected() {
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .description
            .as_mut()
            .unwrap()
            .establishment = Some("x".repeat(101));
        assert!(
            violated_fields(&request)
                .contains(&"transaction.description.establishment".to_string())
        );
    }

    #[test]
    fn establishment_of_exactly_100_characters_passes() {
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .description
            .as_mut()
            .unwrap()
            .establishment = Some("x".repeat(100));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn zero_installments_are_rejected() {
        let mut request = valid_request();
        request
            .transaction
            .as_mut()
            .unwrap()
            .payment_method
            .as_mut()
            .unwrap()
            .installments = Some(0);
        assert!(
            violated_fields(&request)
                .contains(&"transaction.payment_method.installments".to_string())
        );
    }

    #[test]
    fn violations_are_collected_not_fail_fast() {
        let mut request = valid_request();
        let transaction = request.transaction.as_mut().unwrap();
        transaction.card_number = Some(String::new());
        transaction.description.as_mut().unwrap().amount = Some(Decimal::new(0, 2));
        let fields = violated_fields(&request);
        assert!(fields.contains(&"transaction.card_number".to_string()));
        assert!(fields.contains(&"transaction.description.amount".to_string()));
    }

    #[test]
    fn response_serializes_in_wire_order() {
        let response = PaymentResponse {
            transaction: TransactionResponse {
                card_number: "4444********1234".to_string(),
                id: "1".to_string(),
                description: DescriptionResponse {
                    amount: Decimal::new(5000, 2),
                    date_time: "01/05/2021 18:30:00".to_string(),
                    establishment: "PetShop Mundo cão".to_string(),
                    nsu: "0000000001".to_string(),
                    authorization_code: "147cbf1b3".to_string(),
                    status: TransactionStatus::Authorized,
                },
                payment_method: PaymentMethodResponse {
                    kind: PaymentType::SinglePayment,
                    installments: 1,
                },
            },
        };

        let text = serde_json::to_string(&response).unwrap();
        let positions: Vec<usize> = [
            "\"card_number\"",
            "\"id\"",
            "\"description\"",
            "\"amount\"",
            "\"date_time\"",
            "\"establishment\"",
            "\"nsu\"",
            "\"authorization_code\"",
            "\"status\"",
            "\"payment_method\"",
            "\"type\"",
            "\"installments\"",
        ]
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{text}");
    }
}
