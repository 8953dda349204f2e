//! JWT authentication middleware and role guards.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::collections::BTreeSet;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Role;
use crate::errors::{AppError, AppResult};
use crate::messages;
use crate::services::Claims;

/// Authenticated caller extracted from the JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            email: claims.email,
            roles: claims.roles.into_iter().collect(),
        }
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the bearer token, then injects the `Principal`
/// into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or_else(|| {
            tracing::debug!(path = %request.uri().path(), "Missing bearer token");
            AppError::Unauthorized
        })?;

    let claims = state.auth_service.verify_token(token).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "Rejected token");
        e
    })?;

    request.extensions_mut().insert(Principal::from(claims));

    Ok(next.run(request).await)
}

/// Caller must hold at least one of `roles`.
pub fn require_any_role(principal: &Principal, roles: &[Role]) -> AppResult<()> {
    if principal.has_any_role(roles) {
        Ok(())
    } else {
        Err(AppError::Forbidden(messages::ACCESS_DENIED))
    }
}

pub fn require_admin(principal: &Principal) -> AppResult<()> {
    require_any_role(principal, &[Role::Admin])
}

/// Caller must be the user `user_id`, or an admin.
pub fn require_owner(principal: &Principal, user_id: i32) -> AppResult<()> {
    if principal.is_admin() || principal.id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(messages::USER_FORBIDDEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: i32, roles: &[Role]) -> Principal {
        Principal {
            id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            roles: roles.iter().copied().collect(),
        }
    }

    #[test]
    fn test_from_claims() {
        let claims = Claims {
            sub: 4,
            username: "dora".to_string(),
            email: "dora@example.com".to_string(),
            roles: vec![Role::User],
            iat: 0,
            exp: 1,
        };
        let principal = Principal::from(claims);
        assert_eq!(principal.id, 4);
        assert!(!principal.is_admin());
    }

    #[test]
    fn test_role_guards() {
        let user = principal(1, &[Role::User]);
        let admin = principal(2, &[Role::Admin, Role::User]);

        assert!(require_any_role(&user, &[Role::Admin, Role::User]).is_ok());
        assert!(matches!(
            require_admin(&user),
            Err(AppError::Forbidden(messages::ACCESS_DENIED))
        ));
        assert!(require_admin(&admin).is_ok());
    }

    #[test]
    fn test_owner_guards() {
        let user = principal(1, &[Role::User]);
        let admin = principal(2, &[Role::Admin]);

        assert!(require_owner(&user, 1).is_ok());
        assert!(matches!(
            require_owner(&user, 3),
            Err(AppError::Forbidden(messages::USER_FORBIDDEN))
        ));
        assert!(require_owner(&admin, 3).is_ok());
    }
}
