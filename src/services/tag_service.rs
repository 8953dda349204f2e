//! Tag service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Certificate, CreateTag, Tag, UpdateTag};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::messages;
use crate::types::{Paginated, PaginationParams};
use crate::validators::{ensure_tag_name_free, validate_tag_name};
use crate::with_transaction;

/// Tag service trait for dependency injection.
#[async_trait]
pub trait TagService: Send + Sync {
    async fn save(&self, dto: CreateTag) -> AppResult<Tag>;

    async fn update(&self, id: i32, dto: UpdateTag) -> AppResult<Tag>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn find_by_id(&self, id: i32) -> AppResult<Tag>;

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Tag>>;

    async fn count(&self) -> AppResult<u64>;

    /// Most used tag among the orders of the user who spent the most
    async fn most_popular_tag(&self) -> AppResult<Tag>;

    async fn attach_to_certificate(&self, tag_id: i32, certificate_id: i32)
        -> AppResult<Certificate>;
}

/// Concrete implementation of TagService using Unit of Work.
pub struct TagManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TagManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TagService for TagManager<U> {
    async fn save(&self, dto: CreateTag) -> AppResult<Tag> {
        let name = dto.normalized_name();
        validate_tag_name(&name)?;

        let tags = self.uow.tags();
        ensure_tag_name_free(tags.as_ref(), &name, None).await?;

        let tag = tags.create(name).await?;
        tracing::info!(tag_id = tag.id, "Tag created");
        Ok(tag)
    }

    async fn update(&self, id: i32, dto: UpdateTag) -> AppResult<Tag> {
        let tags = self.uow.tags();
        let current = tags
            .find_by_id(id)
            .await?
            .ok_or_not_found(messages::TAG_NOT_FOUND)?;

        let name = dto.normalized_name();
        validate_tag_name(&name)?;
        if name == current.name {
            return Ok(current);
        }
        ensure_tag_name_free(tags.as_ref(), &name, Some(id)).await?;

        tags.rename(id, name).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.uow.tags().delete(id).await? {
            return Err(AppError::NotFound(messages::TAG_NOT_FOUND));
        }
        tracing::info!(tag_id = id, "Tag deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Tag> {
        self.uow
            .tags()
            .find_by_id(id)
            .await?
            .ok_or_not_found(messages::TAG_NOT_FOUND)
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Tag>> {
        let tags = self.uow.tags();
        let (data, total) = tokio::try_join!(tags.list(params), tags.count())?;
        Ok(Paginated::new(data, &params, total))
    }

    async fn count(&self) -> AppResult<u64> {
        self.uow.tags().count().await
    }

    async fn most_popular_tag(&self) -> AppResult<Tag> {
        let user_id = self
            .uow
            .orders()
            .top_spender()
            .await?
            .ok_or_not_found(messages::POPULAR_TAG_NOT_FOUND)?;

        self.uow
            .tags()
            .most_used_by_user(user_id)
            .await?
            .ok_or_not_found(messages::POPULAR_TAG_NOT_FOUND)
    }

    async fn attach_to_certificate(
        &self,
        tag_id: i32,
        certificate_id: i32,
    ) -> AppResult<Certificate> {
        self.find_by_id(tag_id).await?;
        with_transaction!(self.uow, |ctx| {
            ctx.certificates().attach_tag(certificate_id, tag_id).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockOrderRepository, MockTagRepository};
    use crate::services::test_support::TestUnitOfWork;
    use mockall::predicate::eq;

    fn service(tags: MockTagRepository) -> TagManager<TestUnitOfWork> {
        TagManager::new(Arc::new(TestUnitOfWork::default().with_tags(tags)))
    }

    fn tag(id: i32, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_normalizes_and_creates() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_name()
            .with(eq("hot stone"))
            .returning(|_| Ok(None));
        tags.expect_create()
            .with(eq("hot stone".to_string()))
            .times(1)
            .returning(|name| Ok(tag(1, &name)));

        let created = service(tags)
            .save(CreateTag {
                name: "  hot   stone ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "hot stone");
    }

    #[tokio::test]
    async fn test_save_duplicate_never_writes() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_name()
            .returning(|name| Ok(Some(tag(9, name))));
        tags.expect_create().never();

        let err = service(tags)
            .save(CreateTag {
                name: "spa".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Invalid(messages::TAG_EXISTS)));
    }

    #[tokio::test]
    async fn test_save_invalid_name_never_reads_or_writes() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_name().never();
        tags.expect_create().never();

        let err = service(tags)
            .save(CreateTag {
                name: "#!".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_tag() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_id().returning(|_| Ok(None));
        tags.expect_rename().never();

        let err = service(tags)
            .update(
                4,
                UpdateTag {
                    name: "wellness".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(messages::TAG_NOT_FOUND)));
    }

    #[tokio::test]
    async fn test_attach_missing_tag_never_opens_a_transaction() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_id().with(eq(7)).returning(|_| Ok(None));

        // The test unit of work fails every transaction, so reaching it would surface Internal
        let err = service(tags).attach_to_certificate(7, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(messages::TAG_NOT_FOUND)));
    }

    #[tokio::test]
    async fn test_delete_missing_tag() {
        let mut tags = MockTagRepository::new();
        tags.expect_delete().with(eq(42)).returning(|_| Ok(false));

        let err = service(tags).delete(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(messages::TAG_NOT_FOUND)));
    }

    #[tokio::test]
    async fn test_list_builds_page_meta() {
        let mut tags = MockTagRepository::new();
        tags.expect_list()
            .returning(|_| Ok(vec![tag(1, "spa"), tag(2, "food")]));
        tags.expect_count().returning(|| Ok(12));

        let page = service(tags)
            .list(PaginationParams::new(0, 2))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.meta.total_pages, 6);
    }

    #[tokio::test]
    async fn test_most_popular_tag_without_orders() {
        let mut orders = MockOrderRepository::new();
        orders.expect_top_spender().returning(|| Ok(None));
        let uow = TestUnitOfWork::default().with_orders(orders);

        let err = TagManager::new(Arc::new(uow))
            .most_popular_tag()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound(messages::POPULAR_TAG_NOT_FOUND)
        ));
    }

    #[tokio::test]
    async fn test_most_popular_tag_of_top_spender() {
        let mut orders = MockOrderRepository::new();
        orders.expect_top_spender().returning(|| Ok(Some(7)));
        let mut tags = MockTagRepository::new();
        tags.expect_most_used_by_user()
            .with(eq(7))
            .returning(|_| Ok(Some(tag(3, "spa"))));
        let uow = TestUnitOfWork::default()
            .with_orders(orders)
            .with_tags(tags);

        let popular = TagManager::new(Arc::new(uow))
            .most_popular_tag()
            .await
            .unwrap();
        assert_eq!(popular.id, 3);
    }
}
