//! Unit-of-work double over mock repositories for service tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Role, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    CertificateRepository, MockCertificateRepository, MockOrderRepository, MockTagRepository,
    MockUserRepository, OrderRepository, TagRepository, TransactionContext, TxFuture,
    UnitOfWork, UserRepository,
};

pub struct TestUnitOfWork {
    tags: Arc<MockTagRepository>,
    certificates: Arc<MockCertificateRepository>,
    users: Arc<MockUserRepository>,
    orders: Arc<MockOrderRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            tags: Arc::new(MockTagRepository::new()),
            certificates: Arc::new(MockCertificateRepository::new()),
            users: Arc::new(MockUserRepository::new()),
            orders: Arc::new(MockOrderRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    pub fn with_tags(mut self, repo: MockTagRepository) -> Self {
        self.tags = Arc::new(repo);
        self
    }

    pub fn with_certificates(mut self, repo: MockCertificateRepository) -> Self {
        self.certificates = Arc::new(repo);
        self
    }

    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_orders(mut self, repo: MockOrderRepository) -> Self {
        self.orders = Arc::new(repo);
        self
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn tags(&self) -> Arc<dyn TagRepository> {
        self.tags.clone()
    }

    fn certificates(&self) -> Arc<dyn CertificateRepository> {
        self.certificates.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Transactional paths are covered by the sqlite integration tests
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub fn test_config() -> Config {
    Config::new("sqlite::memory:", "test-secret-key-for-testing-only-32chars")
        .expect("valid test config")
}

pub fn user(id: i32, roles: &[Role]) -> User {
    User {
        id,
        username: format!("user{}", id),
        email: format!("user{}@example.com", id),
        password_hash: String::new(),
        roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        created_at: Utc::now(),
    }
}
