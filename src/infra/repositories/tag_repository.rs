//! Tag repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::entities::{certificate, certificate_tag, order, tag};
use crate::domain::Tag;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::messages;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Tag repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Tag>>;

    /// Exact name lookup
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>>;

    /// One page of tags ordered by id
    async fn list(&self, params: PaginationParams) -> AppResult<Vec<Tag>>;

    async fn count(&self) -> AppResult<u64>;

    async fn create(&self, name: String) -> AppResult<Tag>;

    async fn rename(&self, id: i32, name: String) -> AppResult<Tag>;

    /// Remove a tag and its certificate links. Returns false if no such tag.
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// The tag appearing on most of the user's orders, ties broken by lowest id
    async fn most_used_by_user(&self, user_id: i32) -> AppResult<Option<Tag>>;
}

/// Concrete implementation of TagRepository
pub struct TagStore {
    db: DatabaseConnection,
}

impl TagStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for TagStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Tag>> {
        let result = tag::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Tag::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        find_by_name(&self.db, name).await
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Vec<Tag>> {
        let models = tag::Entity::find()
            .order_by_asc(tag::Column::Id)
            .limit(params.limit())
            .offset(params.offset())
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Tag::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(tag::Entity::find().count(&self.db).await?)
    }

    async fn create(&self, name: String) -> AppResult<Tag> {
        create(&self.db, name).await
    }

    async fn rename(&self, id: i32, name: String) -> AppResult<Tag> {
        let model = tag::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found(messages::TAG_NOT_FOUND)?;

        let mut active: tag::ActiveModel = model.into();
        active.name = Set(name);

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| {
                AppError::unique_violation(e, AppError::Invalid(messages::TAG_EXISTS))
            })?;
        Ok(Tag::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = tag::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn most_used_by_user(&self, user_id: i32) -> AppResult<Option<Tag>> {
        let result = tag::Entity::find()
            .join(JoinType::InnerJoin, tag::Relation::CertificateTag.def())
            .join(JoinType::InnerJoin, certificate_tag::Relation::Certificate.def())
            .join(JoinType::InnerJoin, certificate::Relation::Order.def())
            .filter(order::Column::UserId.eq(user_id))
            .group_by(tag::Column::Id)
            .group_by(tag::Column::Name)
            .order_by_desc(order::Column::Id.count())
            .order_by_asc(tag::Column::Id)
            .one(&self.db)
            .await?;

        Ok(result.map(Tag::from))
    }
}

pub(crate) async fn find_by_name<C: ConnectionTrait>(conn: &C, name: &str) -> AppResult<Option<Tag>> {
    let result = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await?;

    Ok(result.map(Tag::from))
}

pub(crate) async fn create<C: ConnectionTrait>(conn: &C, name: String) -> AppResult<Tag> {
    let active = tag::ActiveModel {
        name: Set(name),
        ..Default::default()
    };

    let model = active
        .insert(conn)
        .await
        .map_err(|e| {
            AppError::unique_violation(e, AppError::Invalid(messages::TAG_EXISTS))
        })?;
    Ok(Tag::from(model))
}

/// Existing tag with this name, or a freshly inserted one
pub(crate) async fn find_or_create<C: ConnectionTrait>(conn: &C, name: &str) -> AppResult<Tag> {
    match find_by_name(conn, name).await? {
        Some(tag) => Ok(tag),
        None => create(conn, name.to_string()).await,
    }
}
