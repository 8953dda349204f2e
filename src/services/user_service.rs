//! User service - accounts and certificate purchases.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{CreateUser, NewOrder, NewUser, Order, Password, Role, UpdateUser, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::messages;
use crate::types::{Paginated, PaginationParams};
use crate::validators::{ensure_user_unique, validate_email, validate_username};
use crate::with_transaction;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an account with the USER role
    async fn register(&self, dto: CreateUser) -> AppResult<User>;

    /// Create an account with both ADMIN and USER roles
    async fn create_admin(&self, dto: CreateUser) -> AppResult<User>;

    async fn update(&self, id: i32, dto: UpdateUser) -> AppResult<User>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn find_by_id(&self, id: i32) -> AppResult<User>;

    async fn find_by_username(&self, username: &str) -> AppResult<User>;

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<User>>;

    /// Buy a certificate at its current price
    async fn purchase_certificate(&self, user_id: i32, certificate_id: i32) -> AppResult<Order>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn prepare(&self, dto: CreateUser, extra_role: Option<Role>) -> AppResult<NewUser> {
        let username = dto.username.trim();
        let email = dto.email.trim().to_lowercase();
        validate_username(username)?;
        validate_email(&email)?;
        ensure_user_unique(self.uow.users().as_ref(), Some(username), Some(&email), None).await?;

        // Hash only once the cheap checks have passed
        let password = Password::new(&dto.password)?;
        let mut new = dto.into_new_user(password);
        new.roles.extend(extra_role);
        Ok(new)
    }

    async fn create(&self, new: NewUser) -> AppResult<User> {
        let user = with_transaction!(self.uow, |ctx| ctx.users().create(new).await)?;
        tracing::info!(user_id = user.id, roles = ?user.roles, "User created");
        Ok(user)
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(&self, dto: CreateUser) -> AppResult<User> {
        let new = self.prepare(dto, None).await?;
        self.create(new).await
    }

    async fn create_admin(&self, dto: CreateUser) -> AppResult<User> {
        let new = self.prepare(dto, Some(Role::Admin)).await?;
        self.create(new).await
    }

    async fn update(&self, id: i32, dto: UpdateUser) -> AppResult<User> {
        let current = self.find_by_id(id).await?;
        if dto.is_empty() {
            return Ok(current);
        }

        let username = dto.username.as_deref().map(str::trim);
        let email = dto.email.as_deref().map(|e| e.trim().to_lowercase());
        if let Some(username) = username {
            validate_username(username)?;
        }
        if let Some(email) = &email {
            validate_email(email)?;
        }
        ensure_user_unique(
            self.uow.users().as_ref(),
            username,
            email.as_deref(),
            Some(id),
        )
        .await?;

        let password = dto.password.as_deref().map(Password::new).transpose()?;
        let user = self.uow.users().update(id, dto.into_patch(password)).await?;

        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.uow.users().delete(id).await? {
            return Err(AppError::NotFound(messages::USER_NOT_FOUND));
        }
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found(messages::USER_NOT_FOUND)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_username(username.trim())
            .await?
            .ok_or_not_found(messages::USER_NOT_FOUND)
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<User>> {
        let users = self.uow.users();
        let (data, total) = tokio::try_join!(users.list(params), users.count())?;
        Ok(Paginated::new(data, &params, total))
    }

    async fn purchase_certificate(&self, user_id: i32, certificate_id: i32) -> AppResult<Order> {
        let order = with_transaction!(self.uow, |ctx| {
            let user = ctx
                .users()
                .find_by_id(user_id)
                .await?
                .ok_or_not_found(messages::USER_NOT_FOUND)?;
            let certificate = ctx
                .certificates()
                .find_by_id(certificate_id)
                .await?
                .ok_or_not_found(messages::CERTIFICATE_NOT_FOUND)?;

            ctx.orders()
                .create(NewOrder::purchase(&user, &certificate))
                .await
        })?;

        tracing::info!(
            order_id = order.id,
            user_id,
            certificate_id,
            cost = %order.cost,
            "Certificate purchased"
        );
        Ok(order)
    }
}
