//! User repository. Roles live in their own table and are loaded with the user.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

use super::entities::{user, user_role};
use crate::domain::{NewUser, User, UserPatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::messages;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// One page of users ordered by id
    async fn list(&self, params: PaginationParams) -> AppResult<Vec<User>>;

    async fn count(&self) -> AppResult<u64>;

    async fn update(&self, id: i32, patch: UserPatch) -> AppResult<User>;

    /// Remove a user together with roles and orders. Returns false if no such user.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        with_roles_one(&self.db, model).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        with_roles_one(&self.db, model).await
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .limit(params.limit())
            .offset(params.offset())
            .all(&self.db)
            .await?;

        with_roles(&self.db, models).await
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn update(&self, id: i32, patch: UserPatch) -> AppResult<User> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found(messages::USER_NOT_FOUND)?;

        let mut active: user::ActiveModel = model.into();
        if let Some(username) = patch.username {
            active.username = Set(username);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = patch.password_hash {
            active.password_hash = Set(password_hash);
        }

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| {
                AppError::unique_violation(e, AppError::Conflict(messages::USER_EXISTS))
            })?;
        with_roles_one(&self.db, Some(model))
            .await?
            .ok_or_not_found(messages::USER_NOT_FOUND)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

async fn with_roles<C: ConnectionTrait>(conn: &C, models: Vec<user::Model>) -> AppResult<Vec<User>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut roles: HashMap<i32, Vec<user_role::Model>> = HashMap::new();
    for role in user_role::Entity::find()
        .filter(user_role::Column::UserId.is_in(ids))
        .all(conn)
        .await?
    {
        roles.entry(role.user_id).or_default().push(role);
    }

    models
        .into_iter()
        .map(|model| {
            let own = roles.remove(&model.id).unwrap_or_default();
            model.into_user(own)
        })
        .collect()
}

async fn with_roles_one<C: ConnectionTrait>(
    conn: &C,
    model: Option<user::Model>,
) -> AppResult<Option<User>> {
    match model {
        Some(model) => Ok(with_roles(conn, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Option<User>> {
    let model = user::Entity::find_by_id(id).one(conn).await?;
    with_roles_one(conn, model).await
}

/// Insert the user row and one row per role.
pub(crate) async fn create<C: ConnectionTrait>(conn: &C, new: NewUser) -> AppResult<User> {
    let active = user::ActiveModel {
        username: Set(new.username),
        email: Set(new.email),
        password_hash: Set(new.password_hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = active
        .insert(conn)
        .await
        .map_err(|e| {
            AppError::unique_violation(e, AppError::Conflict(messages::USER_EXISTS))
        })?;

    for role in &new.roles {
        let active = user_role::ActiveModel {
            user_id: Set(model.id),
            role: Set(role.as_str().to_string()),
        };
        user_role::Entity::insert(active)
            .exec_without_returning(conn)
            .await?;
    }

    find_by_id(conn, model.id)
        .await?
        .ok_or_not_found(messages::USER_NOT_FOUND)
}
