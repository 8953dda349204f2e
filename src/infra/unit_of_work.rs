//! Unit of Work: repository access plus the transaction boundary.
//!
//! Work passed to `transaction` commits when it returns `Ok` and rolls back
//! when it returns `Err`, so a failed compound write leaves nothing behind.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    certificate_repository, order_repository, user_repository, CertificateRepository,
    CertificateStore, OrderRepository, OrderStore, TagRepository, TagStore, UserRepository,
    UserStore,
};
use crate::domain::{Certificate, CertificatePatch, NewCertificate, NewOrder, NewUser, Order, User};
use crate::errors::AppResult;

/// Boxed future returned by transactional work
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction`; tests
/// implement it over mock repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn tags(&self) -> Arc<dyn TagRepository>;

    fn certificates(&self) -> Arc<dyn CertificateRepository>;

    fn users(&self) -> Arc<dyn UserRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    /// Run `f` inside a ReadCommitted transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn certificates(&self) -> TxCertificateRepository<'_> {
        TxCertificateRepository { txn: self.txn }
    }

    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    tag_repo: Arc<TagStore>,
    certificate_repo: Arc<CertificateStore>,
    user_repo: Arc<UserStore>,
    order_repo: Arc<OrderStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            tag_repo: Arc::new(TagStore::new(db.clone())),
            certificate_repo: Arc::new(CertificateStore::new(db.clone())),
            user_repo: Arc::new(UserStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn tags(&self) -> Arc<dyn TagRepository> {
        self.tag_repo.clone()
    }

    fn certificates(&self) -> Arc<dyn CertificateRepository> {
        self.certificate_repo.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        match f(TransactionContext::new(&txn)).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// User writes inside a transaction
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxUserRepository<'_> {
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        user_repository::find_by_id(self.txn, id).await
    }

    pub async fn create(&self, new: NewUser) -> AppResult<User> {
        user_repository::create(self.txn, new).await
    }
}

/// Certificate writes inside a transaction
pub struct TxCertificateRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxCertificateRepository<'_> {
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Certificate>> {
        certificate_repository::find_by_id(self.txn, id).await
    }

    pub async fn create(&self, new: NewCertificate) -> AppResult<Certificate> {
        certificate_repository::create(self.txn, new).await
    }

    pub async fn update(&self, id: i32, patch: CertificatePatch) -> AppResult<Certificate> {
        certificate_repository::update(self.txn, id, patch).await
    }

    pub async fn attach_tag(&self, certificate_id: i32, tag_id: i32) -> AppResult<Certificate> {
        certificate_repository::attach_tag(self.txn, certificate_id, tag_id).await
    }
}

/// Order writes inside a transaction
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxOrderRepository<'_> {
    pub async fn create(&self, new: NewOrder) -> AppResult<Order> {
        order_repository::create(self.txn, new).await
    }
}

/// Run a block inside `$uow.transaction`, boxing the future.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
