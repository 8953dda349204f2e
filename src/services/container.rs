//! Service Container - Centralized service access.
//!
//! Handlers reach every service through trait objects so tests can swap in
//! mocks without touching the router.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CertificateManager, CertificateService, OrderManager,
    OrderService, TagManager, TagService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn tags(&self) -> Arc<dyn TagService>;

    fn certificates(&self) -> Arc<dyn CertificateService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn orders(&self) -> Arc<dyn OrderService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    tag_service: Arc<dyn TagService>,
    certificate_service: Arc<dyn CertificateService>,
    user_service: Arc<dyn UserService>,
    order_service: Arc<dyn OrderService>,
}

impl Services {
    /// Wire every service over one shared Unit of Work
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            tag_service: Arc::new(TagManager::new(uow.clone())),
            certificate_service: Arc::new(CertificateManager::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            order_service: Arc::new(OrderManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn tags(&self) -> Arc<dyn TagService> {
        self.tag_service.clone()
    }

    fn certificates(&self) -> Arc<dyn CertificateService> {
        self.certificate_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}
