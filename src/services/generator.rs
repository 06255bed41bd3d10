//! Settlement number and authorization code generation.

use uuid::Uuid;

use crate::{db::DbPool, error::AppError};

/// Fetch the next settlement number (nsu) and render it as a zero-padded
/// 10-digit decimal string.
///
/// The value comes from the database sequence `transaction_nsu_seq`, so the
/// allocation is a single atomic round trip: durable across restarts, and
/// concurrent requests — or concurrent service instances — never observe the
/// same value.
pub async fn next_settlement_number(pool: &DbPool) -> Result<String, AppError> {
    let next: i64 = sqlx::query_scalar("SELECT nextval('transaction_nsu_seq')")
        .fetch_one(pool)
        .await?;
    Ok(format_settlement_number(next))
}

/// 10 digits is a minimum width, not a cap: a counter value that outgrows it
/// renders at its natural width instead of being truncated.
fn format_settlement_number(value: i64) -> String {
    format!("{value:010}")
}

/// Generate a 9-character authorization code: a random 128-bit value in
/// compact hex form, truncated.
///
/// No uniqueness check against existing codes — the collision probability is
/// negligible.
pub fn authorization_code() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..9].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_numbers_are_zero_padded_to_ten_digits() {
        assert_eq!(format_settlement_number(1), "0000000001");
        assert_eq!(format_settlement_number(42), "0000000042");
        assert_eq!(format_settlement_number(1_234_567_890), "1234567890");
    }

    #[test]
    fn settlement_numbers_beyond_ten_digits_keep_their_natural_width() {
        assert_eq!(format_settlement_number(123_456_789_012), "123456789012");
    }

    #[test]
    fn authorization_codes_are_nine_hex_characters() {
        let code = authorization_code();
        assert_eq!(code.len(), 9);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn authorization_codes_differ_between_calls() {
        assert_ne!(authorization_code(), authorization_code());
    }
}
