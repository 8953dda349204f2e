//! Field-level validation and uniqueness checks.
//!
//! Pure checks take the value and return a validation error on failure.
//! Uniqueness checks read persisted state through a repository and never
//! write.

mod certificate;
mod tag;
mod user;

pub use certificate::{validate_certificate, validate_price};
pub use tag::{ensure_tag_name_free, validate_tag_name};
pub use user::{ensure_user_unique, validate_email, validate_username};

use crate::errors::{AppError, AppResult};

/// Fail with a validation error carrying `message` unless `condition` holds.
fn check(condition: bool, message: impl FnOnce() -> String) -> AppResult<()> {
    if condition {
        Ok(())
    } else {
        Err(AppError::validation(message()))
    }
}

/// Character count within `min..=max`
fn length_between(value: &str, min: u64, max: u64) -> bool {
    let len = value.chars().count() as u64;
    (min..=max).contains(&len)
}
