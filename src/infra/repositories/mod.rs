//! Repository layer - Data access abstraction
//!
//! One trait per aggregate with a SeaORM-backed store. Multi-statement
//! writes are connection-generic functions reused by the unit of work.

pub(crate) mod certificate_repository;
pub(crate) mod entities;
pub(crate) mod order_repository;
pub(crate) mod tag_repository;
pub(crate) mod user_repository;

pub use certificate_repository::{CertificateRepository, CertificateStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use tag_repository::{TagRepository, TagStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use certificate_repository::MockCertificateRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tag_repository::MockTagRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
