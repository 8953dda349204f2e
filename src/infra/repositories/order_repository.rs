//! Order repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::order;
use crate::domain::{NewOrder, Order};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// The order only if it belongs to `user_id`
    async fn find_for_user(&self, user_id: i32, order_id: i32) -> AppResult<Option<Order>>;

    /// One page of all orders, newest first
    async fn list(&self, params: PaginationParams) -> AppResult<Vec<Order>>;

    async fn count(&self) -> AppResult<u64>;

    /// One page of a user's orders, newest first
    async fn list_by_user(&self, user_id: i32, params: PaginationParams) -> AppResult<Vec<Order>>;

    async fn count_by_user(&self, user_id: i32) -> AppResult<u64>;

    /// Returns false if no such order.
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Id of the user with the highest total order cost
    async fn top_spender(&self) -> AppResult<Option<i32>>;
}

/// Concrete implementation of OrderRepository
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_for_user(&self, user_id: i32, order_id: i32) -> AppResult<Option<Order>> {
        let result = order::Entity::find_by_id(order_id)
            .filter(order::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Order::from))
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Vec<Order>> {
        let models = order::Entity::find()
            .order_by_desc(order::Column::PurchaseDate)
            .order_by_desc(order::Column::Id)
            .limit(params.limit())
            .offset(params.offset())
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Order::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(order::Entity::find().count(&self.db).await?)
    }

    async fn list_by_user(&self, user_id: i32, params: PaginationParams) -> AppResult<Vec<Order>> {
        let models = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::PurchaseDate)
            .order_by_desc(order::Column::Id)
            .limit(params.limit())
            .offset(params.offset())
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Order::from).collect())
    }

    async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        Ok(order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = order::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn top_spender(&self) -> AppResult<Option<i32>> {
        let user_id = order::Entity::find()
            .select_only()
            .column(order::Column::UserId)
            .group_by(order::Column::UserId)
            .order_by_desc(order::Column::Cost.sum())
            .order_by_asc(order::Column::UserId)
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;

        Ok(user_id)
    }
}

pub(crate) async fn create<C: ConnectionTrait>(conn: &C, new: NewOrder) -> AppResult<Order> {
    let active = order::ActiveModel {
        user_id: Set(new.user_id),
        certificate_id: Set(new.certificate_id),
        cost: Set(new.cost),
        purchase_date: Set(new.purchase_date),
        ..Default::default()
    };

    let model = active.insert(conn).await?;
    Ok(Order::from(model))
}
