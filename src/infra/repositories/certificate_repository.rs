//! Gift certificate repository.
//!
//! Certificates are always returned together with their tags. Writes that
//! touch more than one table (create, update with tags) are exposed as
//! connection-generic functions so the unit of work can run them inside a
//! transaction.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, LikeExpr, Query},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use std::collections::HashMap;

use super::entities::{certificate, certificate_tag, order, tag};
use super::tag_repository;
use crate::domain::{
    Certificate, CertificateFilter, CertificatePatch, NewCertificate, SortField, SortOrder, Tag,
};
use crate::errors::{AppResult, OptionExt};
use crate::messages;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Certificate repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CertificateRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Certificate>>;

    /// One page of certificates matching the filter
    async fn search(
        &self,
        filter: &CertificateFilter,
        params: PaginationParams,
    ) -> AppResult<Vec<Certificate>>;

    /// Number of certificates matching the filter
    async fn count(&self, filter: &CertificateFilter) -> AppResult<u64>;

    /// Remove a certificate and its tag links. Returns false if no such certificate.
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Whether any order references the certificate
    async fn has_orders(&self, id: i32) -> AppResult<bool>;
}

/// Concrete implementation of CertificateRepository
pub struct CertificateStore {
    db: DatabaseConnection,
}

impl CertificateStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CertificateRepository for CertificateStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Certificate>> {
        find_by_id(&self.db, id).await
    }

    async fn search(
        &self,
        filter: &CertificateFilter,
        params: PaginationParams,
    ) -> AppResult<Vec<Certificate>> {
        let models = filtered(filter)
            .order_by(sort_column(filter.sort), sort_order(filter.order))
            .order_by_asc(certificate::Column::Id)
            .limit(params.limit())
            .offset(params.offset())
            .all(&self.db)
            .await?;

        with_tags(&self.db, models).await
    }

    async fn count(&self, filter: &CertificateFilter) -> AppResult<u64> {
        Ok(filtered(filter).count(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = certificate::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn has_orders(&self, id: i32) -> AppResult<bool> {
        let orders = order::Entity::find()
            .filter(order::Column::CertificateId.eq(id))
            .count(&self.db)
            .await?;

        Ok(orders > 0)
    }
}

fn filtered(filter: &CertificateFilter) -> Select<certificate::Entity> {
    let mut query = certificate::Entity::find();

    for name in &filter.tags {
        let tagged = Query::select()
            .column(certificate_tag::Column::CertificateId)
            .from(certificate_tag::Entity)
            .inner_join(
                tag::Entity,
                Expr::col((tag::Entity, tag::Column::Id))
                    .equals((certificate_tag::Entity, certificate_tag::Column::TagId)),
            )
            .and_where(Expr::col((tag::Entity, tag::Column::Name)).eq(name.as_str()))
            .to_owned();
        query = query.filter(certificate::Column::Id.in_subquery(tagged));
    }

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        query = query.filter(
            Condition::any()
                .add(
                    Expr::col((certificate::Entity, certificate::Column::Name))
                        .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                )
                .add(
                    Expr::col((certificate::Entity, certificate::Column::Description))
                        .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                ),
        );
    }

    query
}

/// Substring pattern matching `search` literally, with backslash as the escape.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn sort_column(field: SortField) -> certificate::Column {
    match field {
        SortField::Name => certificate::Column::Name,
        SortField::CreateDate => certificate::Column::CreateDate,
        SortField::LastUpdateDate => certificate::Column::LastUpdateDate,
    }
}

fn sort_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

/// Attach tags to each certificate model, preserving order.
async fn with_tags<C: ConnectionTrait>(
    conn: &C,
    models: Vec<certificate::Model>,
) -> AppResult<Vec<Certificate>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let rows = certificate_tag::Entity::find()
        .filter(certificate_tag::Column::CertificateId.is_in(ids))
        .find_also_related(tag::Entity)
        .all(conn)
        .await?;

    let mut tags: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (link, tag) in rows {
        if let Some(tag) = tag {
            tags.entry(link.certificate_id)
                .or_default()
                .push(Tag::from(tag));
        }
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let mut own = tags.remove(&model.id).unwrap_or_default();
            own.sort_by(|a, b| a.name.cmp(&b.name));
            model.into_certificate(own)
        })
        .collect())
}

async fn link<C: ConnectionTrait>(conn: &C, certificate_id: i32, tag_id: i32) -> AppResult<()> {
    let active = certificate_tag::ActiveModel {
        certificate_id: Set(certificate_id),
        tag_id: Set(tag_id),
    };
    certificate_tag::Entity::insert(active)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Link every named tag, creating the missing ones.
async fn link_by_names<C: ConnectionTrait>(
    conn: &C,
    certificate_id: i32,
    names: &[String],
) -> AppResult<()> {
    let mut linked = Vec::with_capacity(names.len());
    for name in names {
        let tag = tag_repository::find_or_create(conn, name).await?;
        if !linked.contains(&tag.id) {
            link(conn, certificate_id, tag.id).await?;
            linked.push(tag.id);
        }
    }
    Ok(())
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> AppResult<Option<Certificate>> {
    let Some(model) = certificate::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };

    Ok(with_tags(conn, vec![model]).await?.pop())
}

pub(crate) async fn create<C: ConnectionTrait>(
    conn: &C,
    new: NewCertificate,
) -> AppResult<Certificate> {
    let now = Utc::now();
    let active = certificate::ActiveModel {
        name: Set(new.name),
        description: Set(new.description),
        price: Set(new.price),
        duration: Set(new.duration),
        create_date: Set(now),
        last_update_date: Set(now),
        ..Default::default()
    };

    let model = active.insert(conn).await?;
    link_by_names(conn, model.id, &new.tag_names).await?;

    find_by_id(conn, model.id)
        .await?
        .ok_or_not_found(messages::CERTIFICATE_NOT_FOUND)
}

/// Apply a patch. When the patch carries tag names the tag set is replaced.
pub(crate) async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    patch: CertificatePatch,
) -> AppResult<Certificate> {
    let model = certificate::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_not_found(messages::CERTIFICATE_NOT_FOUND)?;

    let mut active: certificate::ActiveModel = model.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(price) = patch.price {
        active.price = Set(price);
    }
    if let Some(duration) = patch.duration {
        active.duration = Set(duration);
    }
    active.last_update_date = Set(Utc::now());
    active.update(conn).await?;

    if let Some(names) = patch.tag_names {
        certificate_tag::Entity::delete_many()
            .filter(certificate_tag::Column::CertificateId.eq(id))
            .exec(conn)
            .await?;
        link_by_names(conn, id, &names).await?;
    }

    find_by_id(conn, id)
        .await?
        .ok_or_not_found(messages::CERTIFICATE_NOT_FOUND)
}

/// Link an existing tag and bump `last_update_date`. Linking twice is a no-op.
pub(crate) async fn attach_tag<C: ConnectionTrait>(
    conn: &C,
    certificate_id: i32,
    tag_id: i32,
) -> AppResult<Certificate> {
    let model = certificate::Entity::find_by_id(certificate_id)
        .one(conn)
        .await?
        .ok_or_not_found(messages::CERTIFICATE_NOT_FOUND)?;

    let linked = certificate_tag::Entity::find_by_id((certificate_id, tag_id))
        .one(conn)
        .await?;

    if linked.is_none() {
        link(conn, certificate_id, tag_id).await?;
        let mut active: certificate::ActiveModel = model.into();
        active.last_update_date = Set(Utc::now());
        active.update(conn).await?;
    }

    find_by_id(conn, certificate_id)
        .await?
        .ok_or_not_found(messages::CERTIFICATE_NOT_FOUND)
}
