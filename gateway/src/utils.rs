use rust_decimal::Decimal;

use crate::error::{GatewayError, Result};

/// Reject empty or whitespace-only input.
///
/// # Errors
///
/// Returns `GatewayError::Validation` naming `field`.
pub fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject zero and negative amounts.
pub fn require_positive_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(GatewayError::validation(format!(
            "amount must be greater than zero (got {amount})"
        )));
    }
    Ok(())
}

/// A local phone number: 7 to 15 ASCII digits, no separators.
pub fn validate_phone_number(value: &str) -> Result<()> {
    let len_ok = (7..=15).contains(&value.len());
    if !len_ok || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GatewayError::validation("invalid phone number"));
    }
    Ok(())
}

/// Shape check only: `local@domain.tld`, no whitespace.
pub fn validate_email(value: &str) -> Result<()> {
    let invalid = || GatewayError::validation("invalid email address");

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    // some dot with something on both sides
    let last = domain.len().saturating_sub(1);
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last);
    if !dotted {
        return Err(invalid());
    }
    Ok(())
}

/// Reject values shorter than `min` characters.
pub fn require_min_len(field: &str, value: &str, min: usize) -> Result<()> {
    if value.chars().count() < min {
        return Err(GatewayError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_amount() {
        assert!(require_positive_amount(dec!(0.01)).is_ok());
        assert!(require_positive_amount(dec!(0)).is_err());
        assert!(require_positive_amount(dec!(-5)).is_err());
    }

    #[test]
    fn test_phone_number_bounds() {
        assert!(validate_phone_number("5551234").is_ok());
        assert!(validate_phone_number("123456789012345").is_ok());
        assert!(validate_phone_number("555123").is_err());
        assert!(validate_phone_number("1234567890123456").is_err());
        assert!(validate_phone_number("+15551234567").is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("first.last@mail.example.org").is_ok());
        assert!(validate_email("@b.co").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@.co").is_err());
        assert!(validate_email("a@b.").is_err());
        assert!(validate_email("a b@c.de").is_err());
        assert!(validate_email("a@b@c.de").is_err());
        assert!(validate_email("a@b.c.").is_ok());
        assert!(validate_email("a@.b.c").is_ok());
        assert!(validate_email("a@.").is_err());
    }

    #[test]
    fn test_min_len_counts_chars() {
        assert!(require_min_len("password", "1234567", 8).is_err());
        assert!(require_min_len("password", "12345678", 8).is_ok());
        // 7 chars, 14 bytes
        assert!(require_min_len("password", "ééééééé", 8).is_err());
        let err = require_min_len("password", "short", 8).unwrap_err();
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }

    #[test]
    fn test_blank_message_names_field() {
        let err = require_non_blank("receiver", "   ").unwrap_err();
        assert_eq!(err.to_string(), "receiver is required");
    }
}
