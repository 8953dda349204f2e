use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use super::{check, length_between};
use crate::config::{MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;
use crate::messages;

static USERNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid username pattern"));

pub fn validate_username(username: &str) -> AppResult<()> {
    check(
        length_between(username, MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH),
        || {
            format!(
                "Username must be {} to {} characters",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            )
        },
    )?;
    check(USERNAME.is_match(username), || {
        "Username may only contain letters, digits, '_', '.' and '-'".to_string()
    })
}

pub fn validate_email(email: &str) -> AppResult<()> {
    check(email.validate_email(), || {
        "Invalid email format".to_string()
    })
}

/// Username and email must not belong to another user. `current_id` is the
/// user being updated.
pub async fn ensure_user_unique(
    users: &dyn UserRepository,
    username: Option<&str>,
    email: Option<&str>,
    current_id: Option<i32>,
) -> AppResult<()> {
    if let Some(username) = username {
        if let Some(existing) = users.find_by_username(username).await? {
            if Some(existing.id) != current_id {
                return Err(AppError::Conflict(messages::USER_EXISTS));
            }
        }
    }
    if let Some(email) = email {
        if let Some(existing) = users.find_by_email(email).await? {
            if Some(existing.id) != current_id {
                return Err(AppError::Conflict(messages::USER_EXISTS));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, User};
    use crate::infra::MockUserRepository;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn user(id: i32) -> User {
        User {
            id,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            roles: BTreeSet::from([Role::User]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice.w-2_x").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username(&"a".repeat(46)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice").is_err());
    }

    #[tokio::test]
    async fn test_taken_username_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(user(1))));
        repo.expect_find_by_email().returning(|_| Ok(None));

        let err = ensure_user_unique(&repo, Some("alice"), Some("new@example.com"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(messages::USER_EXISTS)));

        // The owner keeps their own username
        assert!(
            ensure_user_unique(&repo, Some("alice"), Some("new@example.com"), Some(1))
                .await
                .is_ok()
        );
    }
}
