use once_cell::sync::Lazy;
use regex::Regex;

use super::{check, length_between};
use crate::config::{MAX_TAG_NAME_LENGTH, MIN_TAG_NAME_LENGTH};
use crate::errors::{AppError, AppResult};
use crate::infra::TagRepository;
use crate::messages;

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N} _-]+$").expect("valid tag name pattern"));

/// Tag names are 2..=45 letters, digits, spaces, `-` or `_`, no surrounding
/// whitespace.
pub fn validate_tag_name(name: &str) -> AppResult<()> {
    check(name == name.trim(), || {
        format!("Tag name '{}' has leading or trailing spaces", name)
    })?;
    check(
        length_between(name, MIN_TAG_NAME_LENGTH, MAX_TAG_NAME_LENGTH),
        || {
            format!(
                "Tag name must be {} to {} characters",
                MIN_TAG_NAME_LENGTH, MAX_TAG_NAME_LENGTH
            )
        },
    )?;
    check(TAG_NAME.is_match(name), || {
        format!("Tag name '{}' contains invalid characters", name)
    })
}

/// No other tag may carry `name`. `current_id` is the tag being renamed.
pub async fn ensure_tag_name_free(
    tags: &dyn TagRepository,
    name: &str,
    current_id: Option<i32>,
) -> AppResult<()> {
    match tags.find_by_name(name).await? {
        Some(existing) if Some(existing.id) != current_id => {
            Err(AppError::Invalid(messages::TAG_EXISTS))
        }
        _ => Ok(()),
    }
}
