//! Order queries and removal. Orders are created through
//! `UserService::purchase_certificate`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Order;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::messages;
use crate::types::{Paginated, PaginationParams};

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Order>>;

    async fn list_by_user(&self, user_id: i32, params: PaginationParams)
        -> AppResult<Paginated<Order>>;

    /// Order `order_id` if it belongs to `user_id`
    async fn find_for_user(&self, user_id: i32, order_id: i32) -> AppResult<Order>;

    async fn delete(&self, order_id: i32) -> AppResult<()>;
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Order>> {
        let orders = self.uow.orders();
        let (data, total) = tokio::try_join!(orders.list(params), orders.count())?;
        Ok(Paginated::new(data, &params, total))
    }

    async fn list_by_user(
        &self,
        user_id: i32,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>> {
        // An unknown user is a 404, not an empty page
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found(messages::USER_NOT_FOUND)?;

        let orders = self.uow.orders();
        let (data, total) = tokio::try_join!(
            orders.list_by_user(user_id, params),
            orders.count_by_user(user_id)
        )?;
        Ok(Paginated::new(data, &params, total))
    }

    async fn find_for_user(&self, user_id: i32, order_id: i32) -> AppResult<Order> {
        self.uow
            .orders()
            .find_for_user(user_id, order_id)
            .await?
            .ok_or_not_found(messages::ORDER_NOT_FOUND)
    }

    async fn delete(&self, order_id: i32) -> AppResult<()> {
        if !self.uow.orders().delete(order_id).await? {
            return Err(AppError::NotFound(messages::ORDER_NOT_FOUND));
        }
        tracing::info!(order_id, "Order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::infra::{MockOrderRepository, MockUserRepository};
    use crate::services::test_support::{user, TestUnitOfWork};
    use chrono::Utc;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn order(id: i32, user_id: i32) -> Order {
        Order {
            id,
            user_id,
            certificate_id: 1,
            cost: Decimal::new(2500, 2),
            purchase_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_by_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut orders = MockOrderRepository::new();
        orders.expect_list_by_user().never();

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_orders(orders);
        let err = OrderManager::new(Arc::new(uow))
            .list_by_user(5, PaginationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(messages::USER_NOT_FOUND)));
    }

    #[tokio::test]
    async fn test_list_by_user_pages() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, &[Role::User]))));
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_by_user()
            .with(eq(5), eq(PaginationParams::new(0, 10)))
            .returning(|uid, _| Ok(vec![order(1, uid), order(2, uid)]));
        orders.expect_count_by_user().returning(|_| Ok(2));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_orders(orders);
        let page = OrderManager::new(Arc::new(uow))
            .list_by_user(5, PaginationParams::new(0, 10))
            .await
            .unwrap();
        assert!(page.data.iter().all(|o| o.user_id == 5));
        assert_eq!(page.meta.total_pages, 1);
    }

    #[tokio::test]
    async fn test_find_order_of_other_user() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_for_user()
            .with(eq(5), eq(10))
            .returning(|_, _| Ok(None));

        let uow = TestUnitOfWork::default().with_orders(orders);
        let err = OrderManager::new(Arc::new(uow))
            .find_for_user(5, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(messages::ORDER_NOT_FOUND)));
    }

    #[tokio::test]
    async fn test_delete_missing_order() {
        let mut orders = MockOrderRepository::new();
        orders.expect_delete().returning(|_| Ok(false));

        let uow = TestUnitOfWork::default().with_orders(orders);
        let err = OrderManager::new(Arc::new(uow))
            .delete(3)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(messages::ORDER_NOT_FOUND)));
    }
}
