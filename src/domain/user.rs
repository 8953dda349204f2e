//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use validator::Validate;

use super::{Password, Role};

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Input for persisting a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
}

/// Changes applied to an existing user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// User registration data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Unique login name
    #[validate(length(
        min = 3,
        max = 45,
        message = "Username must be 3 to 45 characters"
    ))]
    #[schema(example = "alice")]
    pub username: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(
        min = 8,
        message = "Password must be at least 8 characters"
    ))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

impl CreateUser {
    /// Map into a persistable user with the given hashed password and the
    /// default USER role.
    pub fn into_new_user(self, password: Password) -> NewUser {
        NewUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash: password.into_string(),
            roles: BTreeSet::from([Role::User]),
        }
    }
}

/// User update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(
        min = 3,
        max = 45,
        message = "Username must be 3 to 45 characters"
    ))]
    #[schema(example = "alice_w")]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice.w@example.com")]
    pub email: Option<String>,
    #[validate(length(
        min = 8,
        message = "Password must be at least 8 characters"
    ))]
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }

    /// Map into a patch, hashing the new password if one was given.
    pub fn into_patch(self, password: Option<Password>) -> UserPatch {
        UserPatch {
            username: self.username.map(|u| u.trim().to_string()),
            email: self.email.map(|e| e.trim().to_lowercase()),
            password_hash: password.map(Password::into_string),
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReadUser {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub roles: Vec<Role>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for ReadUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            roles: user.roles.into_iter().collect(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[Role]) -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hashed".to_string(),
            roles: roles.iter().copied().collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_detection() {
        assert!(user(&[Role::Admin, Role::User]).is_admin());
        assert!(!user(&[Role::User]).is_admin());
    }

    #[test]
    fn test_read_user_hides_password() {
        let read = ReadUser::from(user(&[Role::User]));
        let json = serde_json::to_value(&read).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["roles"], serde_json::json!(["USER"]));
    }

    #[test]
    fn test_create_user_normalizes_email() {
        let dto = CreateUser {
            username: " alice ".to_string(),
            email: "Alice@Example.COM".to_string(),
            password: "12345678".to_string(),
        };
        let new_user = dto.into_new_user(Password::from_hash("h".to_string()));

        assert_eq!(new_user.username, "alice");
        assert_eq!(new_user.email, "alice@example.com");
        assert_eq!(new_user.roles, BTreeSet::from([Role::User]));
    }

    #[test]
    fn test_create_user_validation() {
        let dto = CreateUser {
            username: "al".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
