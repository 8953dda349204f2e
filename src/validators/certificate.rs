use rust_decimal::Decimal;
use std::collections::HashSet;

use super::{check, length_between, validate_tag_name};
use crate::config::{
    MAX_CERTIFICATE_DURATION_DAYS, MAX_CERTIFICATE_NAME_LENGTH, MAX_DESCRIPTION_LENGTH,
    MAX_PRICE_CENTS, MIN_CERTIFICATE_NAME_LENGTH, MIN_DESCRIPTION_LENGTH, PRICE_SCALE,
};
use crate::domain::NewCertificate;
use crate::errors::{AppError, AppResult};
use crate::messages;

/// Validate the full state a certificate will have once written.
pub fn validate_certificate(certificate: &NewCertificate) -> AppResult<()> {
    check(
        length_between(
            &certificate.name,
            MIN_CERTIFICATE_NAME_LENGTH,
            MAX_CERTIFICATE_NAME_LENGTH,
        ),
        || {
            format!(
                "Name must be {} to {} characters",
                MIN_CERTIFICATE_NAME_LENGTH, MAX_CERTIFICATE_NAME_LENGTH
            )
        },
    )?;
    check(
        length_between(
            &certificate.description,
            MIN_DESCRIPTION_LENGTH,
            MAX_DESCRIPTION_LENGTH,
        ),
        || {
            format!(
                "Description must be {} to {} characters",
                MIN_DESCRIPTION_LENGTH, MAX_DESCRIPTION_LENGTH
            )
        },
    )?;
    validate_price(certificate.price)?;
    check(
        (0..=MAX_CERTIFICATE_DURATION_DAYS).contains(&certificate.duration),
        || {
            format!(
                "Duration must be 0 to {} days",
                MAX_CERTIFICATE_DURATION_DAYS
            )
        },
    )?;

    let mut seen = HashSet::new();
    for name in &certificate.tag_names {
        validate_tag_name(name)?;
        if !seen.insert(name.to_lowercase()) {
            return Err(AppError::Invalid(messages::CERTIFICATE_DUPLICATE_TAGS));
        }
    }

    Ok(())
}

/// Non-negative, at most two fraction digits, below 100 million.
pub fn validate_price(price: Decimal) -> AppResult<()> {
    check(!price.is_sign_negative() || price.is_zero(), || {
        "Price must not be negative".to_string()
    })?;
    check(price.normalize().scale() <= PRICE_SCALE, || {
        format!("Price must have at most {} decimal places", PRICE_SCALE)
    })?;
    check(price <= Decimal::new(MAX_PRICE_CENTS, PRICE_SCALE), || {
        format!("Price must not exceed {}", Decimal::new(MAX_PRICE_CENTS, PRICE_SCALE))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificate() -> NewCertificate {
        NewCertificate {
            name: "Spa day".to_string(),
            description: "Sauna and massage".to_string(),
            price: Decimal::new(9999, 2),
            duration: 30,
            tag_names: vec!["spa".to_string(), "relax".to_string()],
        }
    }

    #[test]
    fn test_valid_certificate() {
        assert!(validate_certificate(&certificate()).is_ok());
    }

    #[test]
    fn test_name_and_description_bounds() {
        let mut c = certificate();
        c.name = "S".to_string();
        assert!(validate_certificate(&c).is_err());

        let mut c = certificate();
        c.description = "d".repeat(256);
        assert!(validate_certificate(&c).is_err());
    }

    #[test]
    fn test_price_rules() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::new(1050, 2)).is_ok());
        assert!(validate_price(Decimal::new(10500, 3)).is_ok());
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
        assert!(validate_price(Decimal::new(1001, 3)).is_err());
        assert!(validate_price(Decimal::new(MAX_PRICE_CENTS + 1, 2)).is_err());
    }

    #[test]
    fn test_duration_bounds() {
        let mut c = certificate();
        c.duration = -1;
        assert!(validate_certificate(&c).is_err());
        c.duration = MAX_CERTIFICATE_DURATION_DAYS + 1;
        assert!(validate_certificate(&c).is_err());
        c.duration = 0;
        assert!(validate_certificate(&c).is_ok());
    }

    #[test]
    fn test_duplicate_tags_ignore_case() {
        let mut c = certificate();
        c.tag_names = vec!["Spa".to_string(), "spa".to_string()];

        let err = validate_certificate(&c).unwrap_err();
        assert!(matches!(
            err,
            AppError::Invalid(messages::CERTIFICATE_DUPLICATE_TAGS)
        ));
    }
}
