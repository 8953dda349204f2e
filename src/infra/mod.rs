//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Redis for rate limiting
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, RateLimitStatus};
pub use db::{Database, Migrator};
pub use repositories::{
    CertificateRepository, CertificateStore, OrderRepository, OrderStore, TagRepository,
    TagStore, UserRepository, UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxCertificateRepository, TxFuture, TxOrderRepository,
    TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCertificateRepository, MockOrderRepository, MockTagRepository, MockUserRepository,
};
